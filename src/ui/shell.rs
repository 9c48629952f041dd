//! ui::shell
//!
//! Interactive session: read a command name, run it in shell mode, repeat.
//!
//! # Built-ins
//!
//! - `help` lists registered commands
//! - `exit` / `quit` end the session
//!
//! End of input also ends the session. Unknown names print an error box and
//! the session continues.

use std::collections::BTreeMap;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::sync::Arc;

use super::output::format_command_list;
use super::prompts::{print_error, LineContext, PromptError, ShellContext};
use crate::core::config::DEFAULT_PROMPT;
use crate::engine::Command;

const BUILTINS: &[(&str, &str)] = &[
    ("exit", "Leave the session"),
    ("help", "Show available commands"),
    ("quit", "Leave the session"),
];

/// An interactive session over a reader and a writer.
pub struct Shell<R, W> {
    ctx: LineContext<R, W>,
    prompt: String,
    commands: BTreeMap<String, Arc<Command>>,
}

impl Shell<StdinLock<'static>, Stdout> {
    /// A session on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R, W> Shell<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            ctx: LineContext::new(reader, writer),
            prompt: DEFAULT_PROMPT.to_string(),
            commands: BTreeMap::new(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Make a command runnable by name. A later command with the same name
    /// replaces the earlier one.
    pub fn add_command(&mut self, command: Arc<Command>) {
        self.commands.insert(command.name().to_string(), command);
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Consume the session, returning its reader and writer.
    pub fn into_parts(self) -> (R, W) {
        self.ctx.into_parts()
    }
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Run until `exit`, `quit` or end of input.
    pub fn run(&mut self) -> Result<(), PromptError> {
        loop {
            self.ctx.print(&self.prompt)?;
            let line = match self.ctx.read_line() {
                Ok(line) => line,
                Err(PromptError::Closed) => {
                    self.ctx.println("")?;
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            match line.trim() {
                "" => {}
                "exit" | "quit" => return Ok(()),
                "help" => self.print_help()?,
                name => match self.commands.get(name).cloned() {
                    Some(command) => {
                        tracing::debug!(command = %name, "shell dispatch");
                        command.handle_shell(&mut self.ctx);
                    }
                    None => print_error(&mut self.ctx, format!("unknown command '{}'", name))?,
                },
            }
        }
    }

    fn print_help(&mut self) -> Result<(), PromptError> {
        let entries = self
            .commands
            .values()
            .map(|command| (command.name(), command.short_desc()))
            .chain(BUILTINS.iter().copied());
        let listing = format_command_list(entries);
        self.ctx.print(&listing)
    }
}
