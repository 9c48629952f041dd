//! ui::output
//!
//! Response rendering and listing helpers.
//!
//! # Design
//!
//! Responses are rendered as JSON: indented with a two-space step by default,
//! or on a single line in compact mode. Rendered text goes to stdout.

use anyhow::{Context, Result};

use crate::core::config::OutputFormat;
use crate::core::record::Record;

/// Render a record in the given format.
pub fn render(record: &dyn Record, format: OutputFormat) -> Result<String> {
    let value = record
        .to_json()
        .context("unable to marshal response")?;
    let text = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(&value),
        OutputFormat::Compact => serde_json::to_string(&value),
    }
    .context("unable to marshal response")?;
    Ok(text)
}

/// Print a response as indented JSON.
pub fn pretty_print_response(response: &dyn Record) -> Result<()> {
    println!("{}", render(response, OutputFormat::Pretty)?);
    Ok(())
}

/// Print a response as single-line JSON.
pub fn compact_print_response(response: &dyn Record) -> Result<()> {
    println!("{}", render(response, OutputFormat::Compact)?);
    Ok(())
}

/// Format `name - description` lines, sorted by name, with names padded so
/// descriptions line up.
pub fn format_command_list<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut entries: Vec<(&str, &str)> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    entries
        .iter()
        .map(|(name, desc)| format!("{:<width$} - {}\n", name, desc, width = width))
        .collect()
}

/// Print an error message (always shown).
pub fn error(message: impl std::fmt::Display) {
    eprintln!("error: {}", message);
}
