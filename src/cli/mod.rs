//! cli
//!
//! Command-line interface for the demo binary.
//!
//! # Responsibilities
//!
//! - Load settings and initialize logging
//! - Register the demo commands with a [`Commander`]
//! - Run the selected command statically, or start an interactive session
//!   when no command is given
//!
//! # Architecture
//!
//! The CLI layer is thin. Parsing, flag binding, prompting and dispatch all
//! live in [`crate::engine`]; this module only wires them together.

pub mod args;
pub mod commands;
pub mod logging;

pub use args::Cli;

use anyhow::{Context, Result};

use crate::core::config::Config;
use crate::engine::{report_error_handler, Commander, Defaults};
use crate::ui::shell::Shell;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let loaded = Config::load().context("failed to load settings")?;
    logging::init(loaded.config.log_filter());
    for warning in &loaded.warnings {
        tracing::warn!(path = %warning.path.display(), "{}", warning.message);
    }
    let config = loaded.config;

    let commander = Commander::with_defaults(Cli::root(), Defaults::from_config(&config));
    commands::install(&commander).context("failed to register commands")?;

    let matches = commander.root().get_matches();
    let cli = Cli::from_matches(&matches)?;

    if matches.subcommand().is_some() {
        commander.dispatch_static(&matches)?;
        return Ok(());
    }

    // An interactive session outlives individual failures.
    commander.set_error_handler(report_error_handler());

    let prompt = cli.prompt.unwrap_or_else(|| config.prompt().to_string());
    let mut shell = Shell::stdio().with_prompt(prompt);
    commander.register_shell(&mut shell);
    shell.run().context("interactive session failed")?;
    Ok(())
}
