use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the report.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match synthlabel::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
