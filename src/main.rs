//! Entry point for the dictionary maintenance CLI.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use market_i18n::cli::{
    Cli,
    run,
    write_error,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref());

    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            let _ = write_error(&e, &mut std::io::stderr().lock());
            ExitCode::from(e.exit_code())
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// The returned guard flushes the file writer on drop.
fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file
        && let Some(file_name) = path.file_name()
    {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let file_appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).with_target(false).with_writer(non_blocking))
            .init();
        return Some(guard);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
    None
}
