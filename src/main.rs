//! Sheryl CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use sheryl::cli::{Cli, CommandDispatcher};
use sheryl::logging::{create_sink, LogEvent};
use sheryl::shell::install_interrupt_handler;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for internal diagnostics.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Diagnostics go to stderr; stdout carries only the step log.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("sheryl=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheryl=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Sheryl starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let base_dir = std::env::current_dir().unwrap_or_default();
    let cancel = install_interrupt_handler();

    let mut sink = create_sink(cli.output, Box::new(std::io::stdout()));
    let dispatcher = CommandDispatcher::new(base_dir, cancel);

    match dispatcher.dispatch(&cli, sink.as_mut()) {
        Ok(result) => ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1)),
        Err(e) => {
            sink.emit(&LogEvent::error(e.to_string()));
            ExitCode::from(1)
        }
    }
}
