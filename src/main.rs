//! ibsync CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use ibsync::cli::{Cli, CommandDispatcher};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ibsync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ibsync=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("ibsync starting with args: {:?}", cli);

    // Determine the destination tree
    let dest_root = cli
        .dest
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let dispatcher = CommandDispatcher::new(dest_root, cli.page_url.clone());

    // Exit code 1 means "already up to date"; fatal errors use 2.
    match dispatcher.dispatch(&cli) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
