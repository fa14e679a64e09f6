//! compiler-scout CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use compiler_scout::cli::{Cli, CommandDispatcher};
use compiler_scout::compilers::DiscoveryOptions;
use compiler_scout::config::{ScopeLayout, ScopeStore};
use compiler_scout::platform::Platform;
use compiler_scout::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("compiler_scout=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("compiler_scout=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("compiler-scout starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.quiet, cli.verbose);

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let layout = match &cli.config_root {
        Some(root) => ScopeLayout::rooted(root),
        None => ScopeLayout::default(),
    };
    let discovery = DiscoveryOptions {
        probe_timeout: Duration::from_secs(cli.probe_timeout),
    };

    let mut ui = create_ui(output_mode);
    let dispatcher =
        CommandDispatcher::new(ScopeStore::new(layout), discovery, Platform::current());

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
