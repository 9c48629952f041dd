//! engine::command
//!
//! A single named operation with its request/response exchange.
//!
//! # Resolution
//!
//! Every extension point follows the same chain: the command's own override
//! if set, otherwise the owning commander's default, otherwise a
//! [`CommanderError::NotConfigured`] failure. Resolution reads the current
//! values at call time, so a default changed after registration applies to
//! every command without an override.
//!
//! # Execution
//!
//! Every invocation works on its own [`Exchange`] of zero-valued records, so
//! no value survives from one run to the next and concurrent runs of the same
//! command never share a request.
//!
//! Static mode ([`Command::handle_static`]):
//!
//! ```text
//! fresh exchange -> apply flags -> pre-hooks -> static exec -> post-hooks
//! ```
//!
//! Shell mode ([`Command::handle_shell`]):
//!
//! ```text
//! fresh exchange -> pre-hooks -> shell exec -> post-hooks
//! ```
//!
//! A flag that cannot be applied ends the invocation at the error handler.
//! Hook and exec failures are passed to the resolved error handler; they
//! never abort the remaining steps.
//!
//! # Example
//!
//! ```
//! use serde::Serialize;
//! use twofold::core::record::{Field, Inspect};
//! use twofold::engine::Command;
//!
//! #[derive(Default, Serialize)]
//! struct Echo {
//!     text: String,
//! }
//!
//! impl Inspect for Echo {
//!     fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
//!         fields.push(Field::text("text", &mut self.text).long("text").hint("Text to echo"));
//!     }
//! }
//!
//! let command = Command::new("echo", Echo::default(), Echo::default())
//!     .about("Echo text back")
//!     .with_request_handler(|req, resp| {
//!         let text = req.downcast_ref::<Echo>().map(|r| r.text.clone()).unwrap_or_default();
//!         if let Some(resp) = resp.downcast_mut::<Echo>() {
//!             resp.text = text;
//!         }
//!         Ok(())
//!     });
//! assert_eq!(command.name(), "echo");
//! ```

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock, Weak};

use clap::ArgMatches;

use super::commander::Commander;
use super::errors::{CommanderError, HandlerKind, Level};
use super::handlers::{
    exit_error_handler, CommandHook, ErrorHandler, RegisterFn, RequestHandler, ResponseHandler,
    ShellExec, StaticExec,
};
use super::register::apply_matches;
use crate::core::record::Record;
use crate::ui::prompts::ShellContext;

/// The request and response records of a command.
#[derive(Debug)]
pub struct Exchange {
    pub request: Box<dyn Record>,
    pub response: Box<dyn Record>,
}

impl Exchange {
    /// A new exchange holding zero-valued instances of the same types.
    pub fn fresh(&self) -> Exchange {
        Exchange {
            request: self.request.zeroed(),
            response: self.response.zeroed(),
        }
    }
}

#[derive(Clone, Default)]
struct Overrides {
    registration: Option<RegisterFn>,
    request: Option<RequestHandler>,
    response: Option<ResponseHandler>,
    error: Option<ErrorHandler>,
    static_exec: Option<StaticExec>,
    shell_exec: Option<ShellExec>,
}

/// One named operation.
pub struct Command {
    name: String,
    short_desc: String,
    long_desc: String,
    overrides: RwLock<Overrides>,
    exchange: Mutex<Exchange>,
    commander: OnceLock<Weak<Commander>>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("short_desc", &self.short_desc)
            .finish_non_exhaustive()
    }
}

/// Resolve a slot: local override first, then the commander default.
fn resolve<T>(
    local: Option<T>,
    global: Option<T>,
    kind: HandlerKind,
) -> Result<(Level, T), CommanderError> {
    match (local, global) {
        (Some(handler), _) => Ok((Level::Command, handler)),
        (None, Some(handler)) => Ok((Level::Commander, handler)),
        (None, None) => Err(CommanderError::NotConfigured(kind)),
    }
}

impl Command {
    /// Create a command from its name and request/response records.
    pub fn new(name: impl Into<String>, request: impl Record, response: impl Record) -> Self {
        Self {
            name: name.into(),
            short_desc: String::new(),
            long_desc: String::new(),
            overrides: RwLock::new(Overrides::default()),
            exchange: Mutex::new(Exchange {
                request: Box::new(request),
                response: Box::new(response),
            }),
            commander: OnceLock::new(),
        }
    }

    /// Set the short description.
    pub fn about(mut self, short_desc: impl Into<String>) -> Self {
        self.short_desc = short_desc.into();
        self
    }

    /// Set the long description.
    pub fn long_about(mut self, long_desc: impl Into<String>) -> Self {
        self.long_desc = long_desc.into();
        self
    }

    fn overrides_mut(&mut self) -> &mut Overrides {
        self.overrides
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_registration<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut clap::Command, &Command) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.overrides_mut().registration = Some(Arc::new(f));
        self
    }

    pub fn with_request_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut dyn Record, &mut dyn Record) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.overrides_mut().request = Some(Arc::new(f));
        self
    }

    pub fn with_response_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Record) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.overrides_mut().response = Some(Arc::new(f));
        self
    }

    pub fn with_error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&anyhow::Error) + Send + Sync + 'static,
    {
        self.overrides_mut().error = Some(Arc::new(f));
        self
    }

    pub fn with_static_exec<F>(mut self, f: F) -> Self
    where
        F: Fn(&Command, &mut Exchange, &ArgMatches) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.overrides_mut().static_exec = Some(Arc::new(f));
        self
    }

    pub fn with_shell_exec<F>(mut self, f: F) -> Self
    where
        F: Fn(&Command, &mut Exchange, &mut dyn ShellContext) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.overrides_mut().shell_exec = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_desc(&self) -> &str {
        &self.short_desc
    }

    pub fn long_desc(&self) -> &str {
        &self.long_desc
    }

    /// The owning commander, if the command was added to one that is still alive.
    pub fn commander(&self) -> Option<Arc<Commander>> {
        self.commander.get().and_then(Weak::upgrade)
    }

    pub(crate) fn attach(&self, commander: &Arc<Commander>) {
        if self.commander.set(Arc::downgrade(commander)).is_err() {
            tracing::warn!(command = %self.name, "command already attached to a commander");
        }
    }

    /// Lock the records the command was built with.
    ///
    /// They describe the command's fields for registration and fix the record
    /// types; invocations never write to them.
    pub fn exchange(&self) -> MutexGuard<'_, Exchange> {
        self.exchange.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A zero-valued exchange for one invocation.
    pub fn fresh_exchange(&self) -> Exchange {
        self.exchange().fresh()
    }

    fn overrides(&self) -> Overrides {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_overrides(&self, update: impl FnOnce(&mut Overrides)) {
        update(
            &mut self
                .overrides
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        );
    }

    pub fn set_registration(&self, handler: Option<RegisterFn>) {
        self.update_overrides(|o| o.registration = handler);
    }

    pub fn set_request_handler(&self, handler: Option<RequestHandler>) {
        self.update_overrides(|o| o.request = handler);
    }

    pub fn set_response_handler(&self, handler: Option<ResponseHandler>) {
        self.update_overrides(|o| o.response = handler);
    }

    pub fn set_error_handler(&self, handler: Option<ErrorHandler>) {
        self.update_overrides(|o| o.error = handler);
    }

    pub fn set_static_exec(&self, handler: Option<StaticExec>) {
        self.update_overrides(|o| o.static_exec = handler);
    }

    pub fn set_shell_exec(&self, handler: Option<ShellExec>) {
        self.update_overrides(|o| o.shell_exec = handler);
    }

    pub fn resolve_registration(&self) -> Result<(Level, RegisterFn), CommanderError> {
        let global = self.commander().and_then(|c| c.registration_handler());
        resolve(self.overrides().registration, global, HandlerKind::Registration)
    }

    pub fn resolve_request_handler(&self) -> Result<(Level, RequestHandler), CommanderError> {
        let global = self.commander().and_then(|c| c.default_request_handler());
        resolve(self.overrides().request, global, HandlerKind::Request)
    }

    pub fn resolve_response_handler(&self) -> Result<(Level, ResponseHandler), CommanderError> {
        let global = self.commander().and_then(|c| c.default_response_handler());
        resolve(self.overrides().response, global, HandlerKind::Response)
    }

    pub fn resolve_static_exec(&self) -> Result<(Level, StaticExec), CommanderError> {
        let global = self.commander().and_then(|c| c.static_exec());
        resolve(self.overrides().static_exec, global, HandlerKind::StaticExec)
    }

    pub fn resolve_shell_exec(&self) -> Result<(Level, ShellExec), CommanderError> {
        let global = self.commander().and_then(|c| c.shell_exec());
        resolve(self.overrides().shell_exec, global, HandlerKind::ShellExec)
    }

    /// Resolve the error handler. Always succeeds: a command without a
    /// commander falls back to the terminating default.
    pub fn resolve_error_handler(&self) -> (Level, ErrorHandler) {
        if let Some(handler) = self.overrides().error {
            return (Level::Command, handler);
        }
        match self.commander() {
            Some(commander) => (Level::Commander, commander.error_handler()),
            None => (Level::Commander, exit_error_handler()),
        }
    }

    /// Build the clap subcommand for this command, without flags.
    pub fn static_node(&self) -> clap::Command {
        let mut node = clap::Command::new(self.name.clone());
        if !self.short_desc.is_empty() {
            node = node.about(self.short_desc.clone());
        }
        if !self.long_desc.is_empty() {
            node = node.long_about(self.long_desc.clone());
        }
        node
    }

    /// Register the command under `parent` using the resolved registration.
    pub fn register(&self, parent: &mut clap::Command) -> Result<(), CommanderError> {
        let (level, register) = self.resolve_registration()?;
        tracing::debug!(command = %self.name, %level, "registering command");
        register(parent, self)
            .map_err(|e| CommanderError::delegated(level, HandlerKind::Registration, e))
    }

    /// Invoke the resolved request handler.
    pub fn handle_request(
        &self,
        request: &mut dyn Record,
        response: &mut dyn Record,
    ) -> Result<(), CommanderError> {
        let (level, handler) = self.resolve_request_handler()?;
        handler(request, response)
            .map_err(|e| CommanderError::delegated(level, HandlerKind::Request, e))
    }

    /// Invoke the resolved response handler.
    pub fn handle_response(&self, response: &dyn Record) -> Result<(), CommanderError> {
        let (level, handler) = self.resolve_response_handler()?;
        handler(response).map_err(|e| CommanderError::delegated(level, HandlerKind::Response, e))
    }

    /// Pass an error to the resolved error handler.
    pub fn handle_error(&self, err: &anyhow::Error) {
        let (_, handler) = self.resolve_error_handler();
        handler(err);
    }

    fn run_hooks(&self, hooks: &[CommandHook], phase: &str) {
        for hook in hooks {
            if let Err(err) = hook(self) {
                tracing::warn!(command = %self.name, phase, "hook failed");
                self.handle_error(&err);
            }
        }
    }

    fn hooks(&self) -> (Vec<CommandHook>, Vec<CommandHook>) {
        match self.commander() {
            Some(commander) => (commander.pre_request_hooks(), commander.post_request_hooks()),
            None => (Vec::new(), Vec::new()),
        }
    }

    /// Run one static-mode invocation with parsed matches for this command.
    pub fn handle_static(&self, matches: &ArgMatches) {
        tracing::debug!(command = %self.name, "static invocation");
        let mut exchange = self.fresh_exchange();
        if let Err(err) = apply_matches(exchange.request.as_mut(), matches) {
            self.handle_error(&err.into());
            return;
        }

        let (pre, post) = self.hooks();
        self.run_hooks(&pre, "pre");

        match self.resolve_static_exec() {
            Ok((level, exec)) => {
                if let Err(err) = exec(self, &mut exchange, matches) {
                    let err = CommanderError::delegated(level, HandlerKind::StaticExec, err);
                    self.handle_error(&err.into());
                }
            }
            Err(err) => self.handle_error(&err.into()),
        }

        self.run_hooks(&post, "post");
    }

    /// Run one shell-mode invocation.
    pub fn handle_shell(&self, ctx: &mut dyn ShellContext) {
        tracing::debug!(command = %self.name, "shell invocation");
        let mut exchange = self.fresh_exchange();
        let (pre, post) = self.hooks();

        self.run_hooks(&pre, "pre");

        match self.resolve_shell_exec() {
            Ok((level, exec)) => {
                if let Err(err) = exec(self, &mut exchange, ctx) {
                    let err = CommanderError::delegated(level, HandlerKind::ShellExec, err);
                    self.handle_error(&err.into());
                }
            }
            Err(err) => self.handle_error(&err.into()),
        }

        self.run_hooks(&post, "post");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{Field, Inspect};
    use serde::Serialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default, Serialize)]
    struct Note {
        body: String,
    }

    impl Inspect for Note {
        fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
            fields.push(Field::text("body", &mut self.body));
        }
    }

    fn note(body: &str) -> Note {
        Note { body: body.into() }
    }

    #[test]
    fn detached_command_without_override_is_not_configured() {
        let command = Command::new("note", note(""), note(""));
        assert!(matches!(
            command.resolve_request_handler(),
            Err(CommanderError::NotConfigured(HandlerKind::Request))
        ));
        assert!(matches!(
            command.resolve_static_exec(),
            Err(CommanderError::NotConfigured(HandlerKind::StaticExec))
        ));
    }

    #[test]
    fn local_override_resolves_at_command_level() {
        let command =
            Command::new("note", note(""), note("")).with_request_handler(|_, _| Ok(()));
        let (level, _) = command.resolve_request_handler().unwrap();
        assert_eq!(level, Level::Command);
    }

    #[test]
    fn handle_request_wraps_handler_errors() {
        let command = Command::new("note", note(""), note(""))
            .with_request_handler(|_, _| Err(anyhow::anyhow!("backend down")));
        let mut exchange = command.exchange();
        let Exchange { request, response } = &mut *exchange;
        let err = command
            .handle_request(request.as_mut(), response.as_mut())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "error from command request handler: backend down"
        );
    }

    #[test]
    fn handle_request_passes_both_records() {
        let command = Command::new("note", note("hello"), note("")).with_request_handler(
            |req, resp| {
                let body = req.downcast_ref::<Note>().unwrap().body.to_uppercase();
                resp.downcast_mut::<Note>().unwrap().body = body;
                Ok(())
            },
        );
        let mut exchange = command.exchange();
        let Exchange { request, response } = &mut *exchange;
        command
            .handle_request(request.as_mut(), response.as_mut())
            .unwrap();
        assert_eq!(response.downcast_ref::<Note>().unwrap().body, "HELLO");
    }

    #[test]
    fn runtime_override_replaces_builder_override() {
        let command =
            Command::new("note", note(""), note("")).with_response_handler(|_| Ok(()));
        command.set_response_handler(Some(Arc::new(
            |_: &dyn Record| -> anyhow::Result<()> { Err(anyhow::anyhow!("replaced")) },
        )));
        let exchange = command.exchange();
        let err = command.handle_response(exchange.response.as_ref()).unwrap_err();
        assert!(err.to_string().contains("replaced"));
    }

    #[test]
    fn fresh_exchange_is_zeroed_and_leaves_the_originals() {
        let command = Command::new("note", note("draft"), note("reply"));
        let fresh = command.fresh_exchange();
        assert_eq!(fresh.request.downcast_ref::<Note>().unwrap().body, "");
        assert_eq!(fresh.response.downcast_ref::<Note>().unwrap().body, "");

        let kept = command.exchange();
        assert_eq!(kept.request.downcast_ref::<Note>().unwrap().body, "draft");
        assert_eq!(kept.response.downcast_ref::<Note>().unwrap().body, "reply");
    }

    #[test]
    fn static_node_carries_descriptions() {
        let command = Command::new("note", note(""), note(""))
            .about("Take a note")
            .long_about("Take a note and keep it");
        let node = command.static_node();
        assert_eq!(node.get_name(), "note");
        assert_eq!(
            node.get_about().map(|s| s.to_string()),
            Some("Take a note".to_string())
        );
        assert_eq!(
            node.get_long_about().map(|s| s.to_string()),
            Some("Take a note and keep it".to_string())
        );
    }

    #[derive(Debug, Default, Serialize)]
    struct Tagged {
        body: String,
    }

    impl Inspect for Tagged {
        fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
            fields.push(Field::text("body", &mut self.body).long("body").hint("Body"));
        }
    }

    #[test]
    fn unusable_flag_value_ends_the_invocation() {
        let errors = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));
        let seen_errors = Arc::clone(&errors);
        let seen_runs = Arc::clone(&runs);
        let command = Command::new("note", Tagged::default(), Tagged::default())
            .with_static_exec(move |_, _, _| {
                seen_runs.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .with_error_handler(move |err| {
                assert!(err.to_string().contains("--body"));
                seen_errors.fetch_add(1, Ordering::SeqCst);
            });

        // Bound as an integer, read back as text.
        let matches = clap::Command::new("note")
            .arg(
                clap::Arg::new("body")
                    .long("body")
                    .value_parser(clap::value_parser!(i64)),
            )
            .get_matches_from(["note", "--body", "3"]);
        command.handle_static(&matches);

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exec_errors_go_to_command_error_handler() {
        let errors = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&errors);
        let command = Command::new("note", note(""), note(""))
            .with_static_exec(|_, _, _| Err(anyhow::anyhow!("exec failed")))
            .with_error_handler(move |err| {
                assert!(format!("{:#}", err).contains("error from command static exec"));
                seen.fetch_add(1, Ordering::SeqCst);
            });
        let matches = clap::Command::new("note").get_matches_from(["note"]);
        command.handle_static(&matches);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }
}
