//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Field prompts, the optional-field menu and error boxes
//! - [`output`] - Response rendering and listings
//! - [`shell`] - Interactive session loop
//!
//! # Design
//!
//! Interactive I/O goes through [`prompts::ShellContext`] so sessions can be
//! scripted in tests. Rendered responses go to stdout, errors to stderr.

pub mod output;
pub mod prompts;
pub mod shell;
