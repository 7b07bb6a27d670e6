pub use pico_args::Error;
use pico_args::Arguments as Parser;
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_STORAGE_FILE: &str = ".tl-playground.json";

pub static HELP: &str = "\
tl-playground: compile Teal snippets through the playground worker

USAGE:
    tl-playground [OPTIONS] [FILE]

Compiles FILE, or the snippet chosen with --snippet, or else the snippet
saved by the previous run (the --search query first, then the storage
file, then the `basic` example). Prints syntax errors, type errors and
the generated Lua, saves the source and prints a `?c=...` share query.

OPTIONS:
    -h, --help                Displays this and quits
    -V, --version             Displays version information
    -l, --list                Lists the example snippets
    -n, --snippet NAME        Compiles the named example snippet
    -p, --package-path PATH   Lua package.path used to find tl.lua
                              (default: $TL_PACKAGE_PATH or ./?.lua;./tl/?.lua)
    -s, --storage FILE        Storage file (default: .tl-playground.json)
    -q, --search QUERY        Page query string to load from, e.g. ?c=...
        --lax                 Compiles in lax mode
        --no-save             Does not persist the snippet

ENVIRONMENT:
    TL_PACKAGE_PATH, TL_LAX   Compiler defaults
    RUST_LOG                  Enables logging, e.g. RUST_LOG=tl_playground_worker=debug";

#[derive(Debug, PartialEq, Eq)]
pub enum Arguments {
    ShowHelp,
    ShowVersion,
    ListSnippets,
    Compile(CompileArgs),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Snippet(String),
    Saved,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CompileArgs {
    pub source: Source,
    pub package_path: Option<String>,
    pub storage: PathBuf,
    pub search: String,
    pub lax: bool,
    pub save: bool,
}

impl Arguments {
    pub fn from_env() -> Result<Self, Error> {
        Self::parse(Parser::from_env())
    }

    pub fn from_vec(args: Vec<OsString>) -> Result<Self, Error> {
        Self::parse(Parser::from_vec(args))
    }

    fn parse(mut parser: Parser) -> Result<Self, Error> {
        if parser.contains(["-h", "--help"]) {
            return Ok(Self::ShowHelp);
        }
        if parser.contains(["-V", "--version"]) {
            return Ok(Self::ShowVersion);
        }
        if parser.contains(["-l", "--list"]) {
            return Ok(Self::ListSnippets);
        }

        let lax = parser.contains("--lax");
        let save = !parser.contains("--no-save");
        let snippet: Option<String> = parser.opt_value_from_str(["-n", "--snippet"])?;
        let package_path: Option<String> = parser.opt_value_from_str(["-p", "--package-path"])?;
        let storage: Option<PathBuf> = parser.opt_value_from_str(["-s", "--storage"])?;
        let search: Option<String> = parser.opt_value_from_str(["-q", "--search"])?;
        let file: Option<PathBuf> = parser.opt_free_from_str()?;

        let rest = parser.finish();
        if !rest.is_empty() {
            return Err(Error::ArgumentParsingFailed {
                cause: format!("unexpected arguments: {rest:?}"),
            });
        }

        let source = match (file, snippet) {
            (Some(file), _) => Source::File(file),
            (None, Some(name)) => Source::Snippet(name),
            (None, None) => Source::Saved,
        };

        Ok(Self::Compile(CompileArgs {
            source,
            package_path,
            storage: storage.unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_FILE)),
            search: search.unwrap_or_default(),
            lax,
            save,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Arguments {
        Arguments::from_vec(args.iter().map(OsString::from).collect()).unwrap()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            parse(&[]),
            Arguments::Compile(CompileArgs {
                source: Source::Saved,
                package_path: None,
                storage: PathBuf::from(DEFAULT_STORAGE_FILE),
                search: String::new(),
                lax: false,
                save: true,
            })
        );
    }

    #[test]
    fn test_file_and_flags() {
        let Arguments::Compile(args) = parse(&[
            "--lax",
            "-p",
            "/opt/tl/?.lua",
            "--no-save",
            "-q",
            "?c=eA%3D%3D",
            "main.tl",
        ]) else {
            panic!("expected compile arguments");
        };
        assert_eq!(args.source, Source::File(PathBuf::from("main.tl")));
        assert_eq!(args.package_path.as_deref(), Some("/opt/tl/?.lua"));
        assert_eq!(args.search, "?c=eA%3D%3D");
        assert!(args.lax);
        assert!(!args.save);
    }

    #[test]
    fn test_snippet() {
        let Arguments::Compile(args) = parse(&["--snippet", "records"]) else {
            panic!("expected compile arguments");
        };
        assert_eq!(args.source, Source::Snippet("records".into()));
    }

    #[test]
    fn test_info_flags() {
        assert_eq!(parse(&["-h"]), Arguments::ShowHelp);
        assert_eq!(parse(&["--version"]), Arguments::ShowVersion);
        assert_eq!(parse(&["-l"]), Arguments::ListSnippets);
    }

    #[test]
    fn test_extra_arguments_rejected() {
        let args = vec![OsString::from("a.tl"), OsString::from("b.tl")];
        assert!(Arguments::from_vec(args).is_err());
    }
}
