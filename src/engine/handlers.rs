//! engine::handlers
//!
//! Handler signatures and the process-wide defaults.
//!
//! # Extension points
//!
//! | Slot         | Signature                                   |
//! |--------------|---------------------------------------------|
//! | registration | [`RegisterFn`]: bind the command into a clap tree |
//! | request      | [`RequestHandler`]: populate the response   |
//! | response     | [`ResponseHandler`]: present the response   |
//! | error        | [`ErrorHandler`]: report a failed execution |
//! | static exec  | [`StaticExec`]: flag-driven flow            |
//! | shell exec   | [`ShellExec`]: prompt-driven flow           |
//!
//! Every slot can be overridden per command; [`Defaults`] holds the values a
//! commander falls back to.

use std::sync::Arc;

use clap::ArgMatches;

use super::command::{Command, Exchange};
use super::register::default_registration;
use super::shell_flow::generic_shell_exec;
use super::static_flow::generic_static_exec;
use crate::core::config::{Config, ErrorPolicy, OutputFormat};
use crate::core::record::Record;
use crate::ui::output;
use crate::ui::prompts::ShellContext;

/// Bind a command into a parent clap command.
///
/// The handler runs against a staging copy of the parent. Only the
/// subcommands it adds are merged into the commander's root; changes to the
/// parent's own args or settings are discarded.
pub type RegisterFn =
    Arc<dyn Fn(&mut clap::Command, &Command) -> anyhow::Result<()> + Send + Sync>;

/// Make the request and populate the response.
pub type RequestHandler =
    Arc<dyn Fn(&mut dyn Record, &mut dyn Record) -> anyhow::Result<()> + Send + Sync>;

/// Present a response.
pub type ResponseHandler = Arc<dyn Fn(&dyn Record) -> anyhow::Result<()> + Send + Sync>;

/// Run before or after every execution.
pub type CommandHook = Arc<dyn Fn(&Command) -> anyhow::Result<()> + Send + Sync>;

/// Receive every execution and hook error.
pub type ErrorHandler = Arc<dyn Fn(&anyhow::Error) + Send + Sync>;

/// Flag-driven execution over the invocation's exchange.
pub type StaticExec =
    Arc<dyn Fn(&Command, &mut Exchange, &ArgMatches) -> anyhow::Result<()> + Send + Sync>;

/// Prompt-driven execution over the invocation's exchange.
pub type ShellExec = Arc<
    dyn Fn(&Command, &mut Exchange, &mut dyn ShellContext) -> anyhow::Result<()> + Send + Sync,
>;

/// Report the error and terminate the process.
pub fn exit_error_handler() -> ErrorHandler {
    Arc::new(|err: &anyhow::Error| {
        tracing::error!(error = %format!("{:#}", err), "command failed");
        output::error(format!("{:#}", err));
        std::process::exit(1);
    })
}

/// Report the error and return.
pub fn report_error_handler() -> ErrorHandler {
    Arc::new(|err: &anyhow::Error| {
        tracing::error!(error = %format!("{:#}", err), "command failed");
        output::error(format!("{:#}", err));
    })
}

/// Error handler for a policy.
pub fn error_handler(policy: ErrorPolicy) -> ErrorHandler {
    match policy {
        ErrorPolicy::Exit => exit_error_handler(),
        ErrorPolicy::Report => report_error_handler(),
    }
}

/// Response handler printing in the given format.
pub fn response_handler(format: OutputFormat) -> ResponseHandler {
    match format {
        OutputFormat::Pretty => Arc::new(output::pretty_print_response),
        OutputFormat::Compact => Arc::new(output::compact_print_response),
    }
}

/// Values a commander falls back to when a command sets no override.
///
/// The error handler is mandatory; every other slot may be empty, in which
/// case resolution fails with a "not configured" error.
#[derive(Clone)]
pub struct Defaults {
    pub registration: Option<RegisterFn>,
    pub request: Option<RequestHandler>,
    pub response: Option<ResponseHandler>,
    pub error: ErrorHandler,
    pub static_exec: Option<StaticExec>,
    pub shell_exec: Option<ShellExec>,
}

impl Defaults {
    /// Only an error handler; nothing else resolves.
    pub fn empty(error: ErrorHandler) -> Self {
        Self {
            registration: None,
            request: None,
            response: None,
            error,
            static_exec: None,
            shell_exec: None,
        }
    }

    /// Standard defaults adjusted by loaded settings.
    pub fn from_config(config: &Config) -> Self {
        Self {
            response: Some(response_handler(config.output())),
            error: error_handler(config.on_error()),
            ..Self::default()
        }
    }
}

impl Default for Defaults {
    /// Flag registration, generic static and shell flows, pretty output and
    /// a terminating error handler. There is no default request handler.
    fn default() -> Self {
        Self {
            registration: Some(Arc::new(default_registration)),
            request: None,
            response: Some(response_handler(OutputFormat::Pretty)),
            error: exit_error_handler(),
            static_exec: Some(Arc::new(generic_static_exec)),
            shell_exec: Some(Arc::new(generic_shell_exec)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Settings;

    #[test]
    fn standard_defaults_leave_request_unset() {
        let defaults = Defaults::default();
        assert!(defaults.registration.is_some());
        assert!(defaults.request.is_none());
        assert!(defaults.response.is_some());
        assert!(defaults.static_exec.is_some());
        assert!(defaults.shell_exec.is_some());
    }

    #[test]
    fn empty_defaults_only_have_error_handler() {
        let defaults = Defaults::empty(report_error_handler());
        assert!(defaults.registration.is_none());
        assert!(defaults.response.is_none());
        assert!(defaults.static_exec.is_none());
        assert!(defaults.shell_exec.is_none());
    }

    #[test]
    fn from_config_keeps_flows() {
        let mut config = Config::default();
        config.settings = Settings {
            output: Some(OutputFormat::Compact),
            on_error: Some(ErrorPolicy::Report),
            ..Default::default()
        };
        let defaults = Defaults::from_config(&config);
        assert!(defaults.static_exec.is_some());
        assert!(defaults.shell_exec.is_some());
        assert!(defaults.response.is_some());
        // Report policy returns instead of exiting.
        (defaults.error)(&anyhow::anyhow!("recoverable"));
    }
}
