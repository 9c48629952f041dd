//! Twofold - one command definition, two ways to run it
//!
//! Twofold registers commands whose request and response are plain records.
//! Each command runs either statically, with request fields bound to
//! command-line flags, or interactively, with fields collected by prompting
//! inside a shell session.
//!
//! # Architecture
//!
//! - [`cli`] - Demo binary: argument parsing, logging and example commands
//! - [`engine`] - Commander registry, handler resolution, static and shell flows
//! - [`core`] - Record protocol, field inspection, validation and configuration
//! - [`ui`] - Prompts, output rendering and the shell session
//!
//! # Correctness Invariants
//!
//! 1. Every extension point resolves command override first, then commander default
//! 2. Shell invocations always start from a zero-valued request and response
//! 3. No handler runs before the request has passed collection or validation

pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
