//! engine
//!
//! Command registry, handler resolution and the two execution flows.
//!
//! # Architecture
//!
//! A [`Commander`] owns every [`Command`] plus the [`Defaults`] they fall
//! back to. Each extension point resolves the same way:
//!
//! ```text
//! command override -> commander default -> NotConfigured
//! ```
//!
//! # Execution
//!
//! The same command runs in two modes:
//!
//! - **Static**: flags parsed by clap are copied onto the request, then
//!   [`static_flow::generic_static_exec`] validates and dispatches.
//! - **Shell**: a fresh request is filled by prompting, see
//!   [`shell_flow::generic_shell_exec`].
//!
//! Pre- and post-request hooks wrap both flows. Hook and handler failures go
//! to the resolved error handler rather than back to the caller.
//!
//! # Invariants
//!
//! - Command names are unique within a commander
//! - Each invocation owns its exchange; no lock is held while a user
//!   handler runs

pub mod command;
pub mod commander;
pub mod errors;
pub mod handlers;
pub mod register;
pub mod shell_flow;
pub mod static_flow;

pub use command::{Command, Exchange};
pub use commander::Commander;
pub use errors::{CommanderError, HandlerKind, Level};
pub use handlers::{
    error_handler, exit_error_handler, report_error_handler, response_handler, CommandHook,
    Defaults, ErrorHandler, RegisterFn, RequestHandler, ResponseHandler, ShellExec, StaticExec,
};
