//! The embedded Teal compiler.
//!
//! [`TlCompiler`] owns a Lua state prepared the way `tl.lua` expects to
//! find it in a sandboxed page: `package.path` points at the vendored
//! compiler and `os` only answers `getenv`. Each compile call runs
//!
//! ```lua
//! local tl = require('tl')
//! local env = tl.init_env(lax, gen_compat, gen_target)
//! local output, result = tl.gen(source, env)
//! ```
//!
//! and marshals `output`, `result.syntax_errors` and `result.type_errors`
//! into plain Rust values.

use crate::config::CompilerConfig;
use crate::error::{WorkerError, WorkerResult};
use mlua::{Function, Lua, Table, Value};
use tl_playground_types::{CompileResult, Diagnostic};

/// Anything that turns Teal source into a [`CompileResult`].
///
/// The worker thread is generic over this so that it can be driven by
/// the Lua-backed [`TlCompiler`] or by a stand-in.
pub trait Compile {
    fn compile(&mut self, source: &str) -> WorkerResult<CompileResult>;
}

impl<F> Compile for F
where
    F: FnMut(&str) -> WorkerResult<CompileResult>,
{
    fn compile(&mut self, source: &str) -> WorkerResult<CompileResult> {
        self(source)
    }
}

/// Runs the `tl` module inside an embedded Lua 5.4 interpreter.
pub struct TlCompiler {
    lua: Lua,
    config: CompilerConfig,
}

impl TlCompiler {
    /// Create an interpreter that resolves `tl` through `config.package_path`.
    pub fn new(config: CompilerConfig) -> WorkerResult<Self> {
        let lua = Lua::new();
        {
            let package: Table = lua.globals().get("package")?;
            package.set("path", config.package_path.as_str())?;
            install_os(&lua)?;
        }
        tracing::debug!(package_path = %config.package_path, "lua state ready");
        Ok(Self { lua, config })
    }

    /// Create an interpreter whose `tl` module is the given Lua chunk.
    ///
    /// The chunk is registered in `package.preload`, so it takes priority
    /// over anything on the package path.
    pub fn with_module_source(config: CompilerConfig, source: &str) -> WorkerResult<Self> {
        let compiler = Self::new(config)?;
        {
            let loader = compiler.lua.load(source).set_name("=tl").into_function()?;
            let package: Table = compiler.lua.globals().get("package")?;
            let preload: Table = package.get("preload")?;
            preload.set("tl", loader)?;
        }
        Ok(compiler)
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }
}

impl Compile for TlCompiler {
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    fn compile(&mut self, source: &str) -> WorkerResult<CompileResult> {
        let require: Function = self.lua.globals().get("require")?;
        let tl: Table = require.call("tl")?;

        let init_env: Function = tl.get("init_env")?;
        let flags = self.config.init_env;
        let env: Value = init_env.call((flags.lax, flags.gen_compat, flags.gen_target))?;

        let gen: Function = tl.get("gen")?;
        let (output, result): (Value, Value) = gen.call((source, env))?;
        let Value::Table(result) = result else {
            return Err(WorkerError::UnexpectedResult(format!(
                "tl.gen returned {} instead of a result table",
                result.type_name()
            )));
        };

        let compiled = CompileResult {
            output: convert_output(output)?,
            syntax_errors: convert_errors(result.get("syntax_errors")?)?,
            type_errors: convert_errors(result.get("type_errors")?)?,
        };
        tracing::debug!(
            syntax_errors = compiled.syntax().len(),
            type_errors = compiled.types().len(),
            "compiled"
        );
        Ok(compiled)
    }
}

/// Replace `os` with a table whose only function is `getenv`.
///
/// `TL_DEBUG` reads as unset; every other variable reads as empty.
fn install_os(lua: &Lua) -> mlua::Result<()> {
    let os = lua.create_table()?;
    let getenv = lua.create_function(|_, name: String| {
        Ok(if name == "TL_DEBUG" {
            None
        } else {
            Some(String::new())
        })
    })?;
    os.set("getenv", getenv)?;
    lua.globals().set("os", os)
}

/// Falsy and empty output both read as "no output".
fn convert_output(value: Value<'_>) -> WorkerResult<Option<String>> {
    match value {
        Value::String(s) => {
            let s = s.to_str()?;
            Ok((!s.is_empty()).then(|| s.to_owned()))
        }
        Value::Nil | Value::Boolean(false) => Ok(None),
        other => Err(WorkerError::UnexpectedResult(format!(
            "output is a {}",
            other.type_name()
        ))),
    }
}

/// Convert a Lua array of `{ y, x, msg }` records.
///
/// Entries are read from index 1 upwards and conversion stops at the first
/// nil entry, so anything after a hole is dropped.
pub(crate) fn convert_errors(value: Value<'_>) -> WorkerResult<Option<Vec<Diagnostic>>> {
    let table = match value {
        Value::Nil => return Ok(None),
        Value::Table(table) => table,
        other => {
            return Err(WorkerError::UnexpectedResult(format!(
                "error list is a {}",
                other.type_name()
            )))
        }
    };

    let mut diagnostics = Vec::new();
    for index in 1i64.. {
        let entry = match table.raw_get::<_, Value>(index)? {
            Value::Nil => break,
            Value::Table(entry) => entry,
            other => {
                return Err(WorkerError::UnexpectedResult(format!(
                    "error entry {index} is a {}",
                    other.type_name()
                )))
            }
        };
        diagnostics.push(convert_diagnostic(&entry)?);
    }
    Ok(Some(diagnostics))
}

fn convert_diagnostic(entry: &Table<'_>) -> WorkerResult<Diagnostic> {
    let line: Option<u32> = entry.get("y")?;
    let column: Option<u32> = entry.get("x")?;
    let message: Option<String> = entry.get("msg")?;
    let filename: Option<String> = entry.get("filename")?;

    let mut diagnostic = Diagnostic::new(
        line.unwrap_or_default(),
        column.unwrap_or_default(),
        message.unwrap_or_default(),
    );
    diagnostic.filename = filename;
    Ok(diagnostic)
}
