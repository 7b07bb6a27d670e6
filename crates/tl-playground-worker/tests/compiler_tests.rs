//! End-to-end tests of the worker boundary: source in, reply out.
//!
//! The compiler module is a stand-in `tl` written in Lua with the same
//! entry points (`init_env`, `gen`) and result shape as `tl.lua`.

use pretty_assertions::assert_eq;
use std::time::Duration;
use tl_playground_types::{CompileResult, Diagnostic, Reply, Request};
use tl_playground_worker::{Compile, CompilerConfig, TlCompiler, Worker, WorkerError};

const TL_STUB: &str = include_str!("fixtures/tl_stub.lua");

fn stub_compiler() -> TlCompiler {
    TlCompiler::with_module_source(CompilerConfig::default(), TL_STUB).unwrap()
}

fn stub_worker(config: CompilerConfig) -> Worker {
    Worker::spawn(move || TlCompiler::with_module_source(config, TL_STUB)).unwrap()
}

fn compiled(reply: Reply) -> CompileResult {
    match reply {
        Reply::Compiled(result) => result,
        Reply::Error(e) => panic!("expected a compiled reply, got error: {e}"),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Direct compiler calls
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn clean_source_has_output_and_no_diagnostics() {
    let mut compiler = stub_compiler();
    let result = compiler.compile("local x: number = 1\nprint(x)").unwrap();
    assert_eq!(result.output.as_deref(), Some("local x = 1\nprint(x)"));
    assert_eq!(result.syntax_errors, Some(vec![]));
    assert_eq!(result.type_errors, Some(vec![]));
    assert!(!result.has_errors());
}

#[test]
fn syntax_error_is_reported_with_position() {
    let mut compiler = stub_compiler();
    let result = compiler.compile("local x = 1\nlocal y = @@").unwrap();
    assert_eq!(result.output, None);
    assert_eq!(result.syntax(), &[Diagnostic::new(2, 11, "syntax error")]);
    assert!(result.types().is_empty());
}

#[test]
fn type_error_is_reported_with_position() {
    let mut compiler = stub_compiler();
    let result = compiler.compile("local x: number = \"hi\"").unwrap();
    assert_eq!(
        result.types(),
        &[Diagnostic::new(
            1,
            8,
            "in local declaration: got string, expected number"
        )]
    );
    assert!(result.output.is_some());
}

#[test]
fn lax_flag_reaches_init_env() {
    let config = CompilerConfig::default().with_lax(true);
    let mut compiler = TlCompiler::with_module_source(config, TL_STUB).unwrap();
    let result = compiler.compile("local x: number = \"hi\"").unwrap();
    assert!(result.types().is_empty());
}

#[test]
fn sparse_error_list_is_truncated_at_the_hole() {
    let mut compiler = stub_compiler();
    let result = compiler.compile("-- sparse").unwrap();
    assert_eq!(result.syntax(), &[Diagnostic::new(1, 1, "first")]);
}

#[test]
fn lua_error_becomes_interpreter_fault() {
    let mut compiler = stub_compiler();
    let err = compiler.compile("-- fault").unwrap_err();
    let WorkerError::Interpreter(message) = err else {
        panic!("expected an interpreter fault, got {err:?}");
    };
    assert!(message.contains("attempt to index a nil value"), "{message}");
}

#[test]
fn source_is_passed_as_data_not_code() {
    let mut compiler = stub_compiler();
    let tricky = "print(\"]]\\\"); os.exit() --\")";
    let result = compiler.compile(tricky).unwrap();
    assert_eq!(result.output.as_deref(), Some(tricky));
}

#[test]
fn missing_module_is_a_fault() {
    let config = CompilerConfig::default().with_package_path("/nonexistent/?.lua");
    let mut compiler = TlCompiler::new(config).unwrap();
    let err = compiler.compile("local x = 1").unwrap_err();
    assert!(err.to_string().contains("module 'tl' not found"), "{err}");
}

#[test]
fn module_returning_bad_result_is_a_fault() {
    let module = r#"
        return {
            init_env = function() return {} end,
            gen = function() return "out", "not a table" end,
        }
    "#;
    let mut compiler = TlCompiler::with_module_source(CompilerConfig::default(), module).unwrap();
    assert!(matches!(
        compiler.compile("x"),
        Err(WorkerError::UnexpectedResult(_))
    ));
}

#[test]
fn compiler_state_is_reused_across_calls() {
    let mut compiler = stub_compiler();
    for i in 0..20 {
        let result = compiler.compile(&format!("local n{i}: number = {i}")).unwrap();
        assert_eq!(result.output, Some(format!("local n{i} = {i}")));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Through the worker thread
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn worker_replies_compiled() {
    let worker = stub_worker(CompilerConfig::default());
    let result = compiled(worker.compile("local s: string = 'x'").unwrap());
    assert_eq!(result.output.as_deref(), Some("local s = 'x'"));
}

#[test]
fn worker_isolates_faults() {
    let worker = stub_worker(CompilerConfig::default());

    let reply = worker.compile("-- fault").unwrap();
    assert!(reply.is_error());

    let result = compiled(worker.compile("local y = @@").unwrap());
    assert_eq!(result.syntax().len(), 1);
}

#[test]
fn worker_reply_serializes_to_wire_format() {
    let worker = stub_worker(CompilerConfig::default());
    worker.post(Request::compile("@@")).unwrap();
    let reply = worker.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(
        reply.to_json(),
        r#"["compiled",null,[{"line":1,"column":1,"message":"syntax error"}],[]]"#
    );
}

#[test]
fn worker_with_missing_module_keeps_answering() {
    let config = CompilerConfig::default().with_package_path("/nonexistent/?.lua");
    let worker = Worker::spawn_tl(config).unwrap();
    for _ in 0..3 {
        let reply = worker.compile("local x = 1").unwrap();
        assert!(reply.is_error());
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Real compiler
// ══════════════════════════════════════════════════════════════════════════════

#[test]
#[ignore = "requires tl.lua on TL_PACKAGE_PATH"]
fn real_tl_compiles_and_reports() {
    let mut compiler = TlCompiler::new(CompilerConfig::from_env()).unwrap();

    let ok = compiler.compile("local x: number = 1").unwrap();
    assert!(ok.output.is_some());
    assert!(!ok.has_errors());

    let bad = compiler.compile("local x: number = = 1").unwrap();
    assert!(!bad.syntax().is_empty());
    assert_eq!(bad.syntax()[0].line, 1);
}
