//! cli::args
//!
//! Root command definition using clap derive.
//!
//! Registered commands are attached to the command built here as
//! subcommands, so the derive struct only carries root-level options:
//! - `--help` / `-h`: Show help
//! - `--version` / `-V`: Show version
//! - `--prompt <text>`: Prompt for the interactive session

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

/// Twofold - run commands from flags or from an interactive session
#[derive(Parser, Debug)]
#[command(name = "twofold")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Prompt shown by the interactive session
    #[arg(long)]
    pub prompt: Option<String>,
}

impl Cli {
    /// The root clap command, without any registered subcommands.
    pub fn root() -> clap::Command {
        <Self as CommandFactory>::command()
    }

    /// Extract root-level options from matches of the full command tree.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        <Self as FromArgMatches>::from_arg_matches(matches)
    }
}
