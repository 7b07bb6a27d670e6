mod arguments;

use arguments::{Arguments, CompileArgs, Source, HELP};
use std::fs;
use std::process::ExitCode;
use std::sync::Once;
use tl_playground_editor::snippets;
use tl_playground_storage::{local_store, Location, Session};
use tl_playground_types::{CompileResult, DiagnosticKind, Reply};
use tl_playground_worker::{CompilerConfig, Worker};

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();

    let arguments = match Arguments::from_env() {
        Ok(arguments) => arguments,
        Err(error) => {
            eprintln!("error: {error}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match arguments {
        Arguments::ShowHelp => {
            println!("{HELP}");
            ExitCode::SUCCESS
        }
        Arguments::ShowVersion => {
            println!("tl-playground {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Arguments::ListSnippets => {
            for label in snippets::labels() {
                println!("{label}");
            }
            ExitCode::SUCCESS
        }
        Arguments::Compile(args) => match run(args) {
            Ok(code) => code,
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::from(2)
            }
        },
    }
}

fn run(args: CompileArgs) -> Result<ExitCode, String> {
    let session = Session::new(local_store(&args.storage), Location::from_search(&args.search));

    let source = match &args.source {
        Source::File(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?,
        Source::Snippet(label) => snippets::get(label)
            .map(|s| s.code.to_string())
            .ok_or_else(|| format!("no snippet named '{label}' (try --list)"))?,
        Source::Saved => session.load(),
    };

    let mut config = CompilerConfig::from_env();
    if let Some(path) = args.package_path {
        config = config.with_package_path(path);
    }
    if args.lax {
        config = config.with_lax(true);
    }
    tracing::debug!(?config, "starting compilation worker");

    let worker = Worker::spawn_tl(config).map_err(|e| e.to_string())?;
    let reply = worker.compile(source.as_str()).map_err(|e| e.to_string())?;

    let code = match reply {
        Reply::Compiled(result) => {
            print_result(&result);
            if result.has_errors() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Reply::Error(fault) => {
            eprintln!("compiler fault: {fault}");
            ExitCode::from(2)
        }
    };

    if args.save {
        session.save(source);
        session.flush();
        println!("share: {}", session.search());
    }

    Ok(code)
}

fn print_result(result: &CompileResult) {
    for kind in [DiagnosticKind::Syntax, DiagnosticKind::Type] {
        let diagnostics: Vec<_> = result
            .diagnostics()
            .filter(|(k, _)| *k == kind)
            .map(|(_, d)| d)
            .collect();
        if diagnostics.is_empty() {
            continue;
        }
        eprintln!("{} {}(s):", diagnostics.len(), kind);
        for diagnostic in diagnostics {
            eprintln!("  {diagnostic}");
        }
    }
    if let Some(output) = &result.output {
        println!("{output}");
    }
}
