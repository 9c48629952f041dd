//! engine::errors
//!
//! Error types for command registration and execution.

use std::fmt;

use thiserror::Error;

use crate::core::inspect::InspectError;
use crate::core::record::Kind;

/// Which level of the resolution chain produced a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Override set on the command itself
    Command,
    /// Default held by the commander
    Commander,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Command => f.write_str("command"),
            Level::Commander => f.write_str("commander"),
        }
    }
}

/// The overridable extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Registration,
    Request,
    Response,
    StaticExec,
    ShellExec,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandlerKind::Registration => "registration handler",
            HandlerKind::Request => "request handler",
            HandlerKind::Response => "response handler",
            HandlerKind::StaticExec => "static exec",
            HandlerKind::ShellExec => "shell exec",
        })
    }
}

/// Errors from the commander and its commands.
#[derive(Debug, Error)]
pub enum CommanderError {
    /// Neither the command nor the commander defines the handler.
    #[error("no {0} defined")]
    NotConfigured(HandlerKind),

    /// A resolved handler returned an error.
    #[error("error from {level} {kind}: {cause:#}")]
    Delegated {
        level: Level,
        kind: HandlerKind,
        cause: anyhow::Error,
    },

    #[error("failed to resolve command in register: '{0}'")]
    UnknownCommand(String),

    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("no command given")]
    MissingCommand,

    /// A field carrying flag tags has a kind that cannot be bound to a flag.
    #[error("unhandled type: field '{field}' of kind {kind} cannot be bound to a flag")]
    UnhandledType { field: String, kind: Kind },

    /// Two fields of one request bind the same flag.
    #[error("flag '{0}' is bound by more than one field")]
    DuplicateFlag(String),

    #[error("invalid value for flag '--{flag}': {message}")]
    FlagValue { flag: String, message: String },

    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl CommanderError {
    /// Wrap an error returned by a resolved handler.
    pub fn delegated(level: Level, kind: HandlerKind, cause: anyhow::Error) -> Self {
        CommanderError::Delegated { level, kind, cause }
    }
}
