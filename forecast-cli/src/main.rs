//! Binary crate for the `download-weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Reading the template and mapping failures to exit codes

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use forecast_core::{EX_GENERAL, EX_USAGE};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cmd = match cli::Cli::try_parse() {
        Ok(cmd) => cmd,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_exit(&err));
        }
    };

    init_tracing(cmd.verbose);

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("download-weather: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Help and version requests are not failures; every other parse error is.
fn usage_exit(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EX_USAGE,
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<forecast_core::Error>()
        .map_or(EX_GENERAL, forecast_core::Error::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn core_errors_keep_their_exit_code() {
        let err = anyhow::Error::new(forecast_core::Error::Usage("bad".into()));
        assert_eq!(exit_code(&err), 64);

        let err: anyhow::Error = Err::<(), _>(forecast_core::Error::Unavailable {
            status: Some(500),
            reason: "Internal Server Error".into(),
        })
        .context("fetching forecast")
        .unwrap_err();
        assert_eq!(exit_code(&err), 69);
    }

    fn parse_error(args: &[&str]) -> clap::Error {
        cli::Cli::try_parse_from(std::iter::once("download-weather").chain(args.iter().copied()))
            .unwrap_err()
    }

    #[test]
    fn bad_arguments_exit_with_usage() {
        assert_eq!(usage_exit(&parse_error(&["--bogus", "19104"])), 64);
        assert_eq!(usage_exit(&parse_error(&[])), 64);
        assert_eq!(usage_exit(&parse_error(&["1", "2", "3"])), 64);
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        assert_eq!(usage_exit(&parse_error(&["--help"])), 0);
        assert_eq!(usage_exit(&parse_error(&["-h"])), 0);
        assert_eq!(usage_exit(&parse_error(&["--version"])), 0);
    }

    #[test]
    fn other_errors_are_general() {
        let err = anyhow::anyhow!("template file missing");
        assert_eq!(exit_code(&err), 1);
    }
}
