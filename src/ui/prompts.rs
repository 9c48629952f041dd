//! ui::prompts
//!
//! Interactive prompts for shell mode.
//!
//! # Design
//!
//! Prompting goes through [`ShellContext`], the line-oriented surface of an
//! interactive session: print text, read one line. [`LineContext`] implements
//! it over any `BufRead`/`Write` pair, so sessions can be driven from stdin or
//! from a scripted buffer in tests.

use std::fmt::Display;
use std::io::{BufRead, Write};

use thiserror::Error;

use crate::core::inspect::{AssignError, FieldInfo};

/// Minimum width of a rendered error box.
pub const MIN_ERROR_WIDTH: usize = 37;

const ERROR_TITLE: &str = "error";

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed")]
    Closed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("field '{field}': {source}")]
    Assign {
        field: String,
        source: AssignError,
    },
}

/// The line-oriented surface of an interactive session.
pub trait ShellContext {
    /// Write text without a trailing newline.
    fn print(&mut self, text: &str) -> Result<(), PromptError>;

    /// Read one line of input, without its line terminator.
    fn read_line(&mut self) -> Result<String, PromptError>;

    /// Write text followed by a newline.
    fn println(&mut self, text: &str) -> Result<(), PromptError> {
        self.print(text)?;
        self.print("\n")
    }
}

/// [`ShellContext`] over a reader and a writer.
pub struct LineContext<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LineContext<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> ShellContext for LineContext<R, W> {
    fn print(&mut self, text: &str) -> Result<(), PromptError> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

/// Prompt for one field and store the answer in it.
///
/// Prints `name:` and reads a single line.
pub fn collect_value(
    ctx: &mut dyn ShellContext,
    field: &mut FieldInfo<'_>,
) -> Result<(), PromptError> {
    ctx.print(&format!("{}:", field.name))?;
    let input = ctx.read_line()?;
    field.assign(&input).map_err(|source| PromptError::Assign {
        field: field.path(),
        source,
    })
}

/// Present the optional-field menu and read a selection.
///
/// Returns `Ok(None)` when the user picks `0` or there is nothing to offer,
/// otherwise the index into `fields`. Invalid input prints an error and
/// re-renders the menu.
pub fn present_options(
    ctx: &mut dyn ShellContext,
    fields: &[FieldInfo<'_>],
) -> Result<Option<usize>, PromptError> {
    if fields.is_empty() {
        return Ok(None);
    }

    loop {
        ctx.println("")?;
        ctx.println("Optional query parameters:")?;
        ctx.println("")?;
        ctx.println("[0] - I'm done")?;
        for (i, field) in fields.iter().enumerate() {
            ctx.println(&format!("[{}] - {}", i + 1, field.path()))?;
        }
        ctx.println("")?;
        ctx.println("Select an option: ")?;

        let selected = ctx.read_line()?;
        match selected.trim().parse::<usize>() {
            Ok(0) => return Ok(None),
            Ok(choice) if choice <= fields.len() => return Ok(Some(choice - 1)),
            _ => print_error(ctx, "Invalid option, try again")?,
        }
    }
}

/// Render an error inside an asterisk box titled `error`.
///
/// The box is at least [`MIN_ERROR_WIDTH`] wide and grows with the message.
pub fn error_box(message: &str) -> String {
    let width = message.chars().count().max(MIN_ERROR_WIDTH);
    let padding = "*".repeat((width - ERROR_TITLE.len() - 2) / 2);
    format!(
        "{padding} {ERROR_TITLE} {padding}\n{message}\n{}\n",
        "*".repeat(width)
    )
}

/// Print an error box to the session.
pub fn print_error(ctx: &mut dyn ShellContext, err: impl Display) -> Result<(), PromptError> {
    ctx.print(&error_box(&err.to_string()))
}
