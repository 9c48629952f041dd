//! engine::commander
//!
//! Process-wide registry of commands and default handlers.
//!
//! # Concurrency
//!
//! The command map, hook lists and default slots share one `RwLock`:
//! lookups and resolution take the read lock, `add`, setters and hook
//! appends take the write lock. Locks are released before any handler runs,
//! so a handler may itself register commands.
//!
//! The root clap command sits behind its own mutex. Registration runs
//! against a detached staging parent; the subcommands it produces are merged
//! into the root afterwards.
//!
//! # Example
//!
//! ```
//! use serde::Serialize;
//! use twofold::core::record::{Field, Inspect};
//! use twofold::engine::{Command, Commander};
//!
//! #[derive(Default, Serialize)]
//! struct Greet {
//!     name: String,
//! }
//!
//! impl Inspect for Greet {
//!     fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
//!         fields.push(
//!             Field::text("name", &mut self.name)
//!                 .valid("required")
//!                 .long("name")
//!                 .hint("Name to greet"),
//!         );
//!     }
//! }
//!
//! let commander = Commander::new(clap::Command::new("app"));
//! commander
//!     .add([Command::new("greet", Greet::default(), Greet::default()).about("Say hello")])
//!     .unwrap();
//!
//! assert!(commander.cmd("greet").is_ok());
//! assert!(commander.root().find_subcommand("greet").is_some());
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use clap::ArgMatches;

use super::command::Command;
use super::errors::CommanderError;
use super::handlers::{
    CommandHook, Defaults, ErrorHandler, RegisterFn, RequestHandler, ResponseHandler, ShellExec,
    StaticExec,
};
use crate::ui::output::format_command_list;
use crate::ui::shell::Shell;

struct State {
    commands: BTreeMap<String, Arc<Command>>,
    pre_request: Vec<CommandHook>,
    post_request: Vec<CommandHook>,
    defaults: Defaults,
}

/// Registry of commands plus the defaults they fall back to.
pub struct Commander {
    state: RwLock<State>,
    root: Mutex<clap::Command>,
}

impl std::fmt::Debug for Commander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commander")
            .field("commands", &self.read().commands.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Commander {
    /// Create a commander with the standard [`Defaults`].
    pub fn new(root: clap::Command) -> Arc<Self> {
        Self::with_defaults(root, Defaults::default())
    }

    /// Create a commander with explicit defaults.
    pub fn with_defaults(root: clap::Command, defaults: Defaults) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(State {
                commands: BTreeMap::new(),
                pre_request: Vec::new(),
                post_request: Vec::new(),
                defaults,
            }),
            root: Mutex::new(root),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pass an error to the default error handler.
    pub fn handle_error(&self, err: &anyhow::Error) {
        let handler = self.error_handler();
        handler(err);
    }

    pub fn error_handler(&self) -> ErrorHandler {
        Arc::clone(&self.read().defaults.error)
    }

    pub fn set_error_handler(&self, handler: ErrorHandler) {
        self.write().defaults.error = handler;
    }

    pub fn registration_handler(&self) -> Option<RegisterFn> {
        self.read().defaults.registration.clone()
    }

    pub fn set_default_registration_handler(&self, handler: Option<RegisterFn>) {
        self.write().defaults.registration = handler;
    }

    pub fn shell_exec(&self) -> Option<ShellExec> {
        self.read().defaults.shell_exec.clone()
    }

    pub fn set_default_shell_exec(&self, exec: Option<ShellExec>) {
        self.write().defaults.shell_exec = exec;
    }

    pub fn static_exec(&self) -> Option<StaticExec> {
        self.read().defaults.static_exec.clone()
    }

    pub fn set_default_static_exec(&self, exec: Option<StaticExec>) {
        self.write().defaults.static_exec = exec;
    }

    pub fn default_request_handler(&self) -> Option<RequestHandler> {
        self.read().defaults.request.clone()
    }

    /// Set the request handler used by every command without its own.
    pub fn set_default_request_handler(&self, handler: Option<RequestHandler>) {
        self.write().defaults.request = handler;
    }

    pub fn default_response_handler(&self) -> Option<ResponseHandler> {
        self.read().defaults.response.clone()
    }

    /// Set the response handler used by every command without its own.
    pub fn set_default_response_handler(&self, handler: Option<ResponseHandler>) {
        self.write().defaults.response = handler;
    }

    /// Append hooks run before every execution, in order.
    pub fn add_pre_request_hooks(&self, hooks: impl IntoIterator<Item = CommandHook>) {
        self.write().pre_request.extend(hooks);
    }

    pub fn pre_request_hooks(&self) -> Vec<CommandHook> {
        self.read().pre_request.clone()
    }

    /// Append hooks run after every execution, in order.
    pub fn add_post_request_hooks(&self, hooks: impl IntoIterator<Item = CommandHook>) {
        self.write().post_request.extend(hooks);
    }

    pub fn post_request_hooks(&self) -> Vec<CommandHook> {
        self.read().post_request.clone()
    }

    /// Write every command with its short description, sorted by name.
    pub fn print_command_list(&self, out: &mut dyn io::Write) -> io::Result<()> {
        let state = self.read();
        let listing = format_command_list(
            state
                .commands
                .values()
                .map(|command| (command.name(), command.short_desc())),
        );
        out.write_all(listing.as_bytes())
    }

    /// Look up a command by name.
    pub fn cmd(&self, name: &str) -> Result<Arc<Command>, CommanderError> {
        self.read()
            .commands
            .get(name)
            .cloned()
            .ok_or_else(|| CommanderError::UnknownCommand(name.to_string()))
    }

    /// Snapshot of all registered commands.
    pub fn all(&self) -> BTreeMap<String, Arc<Command>> {
        self.read().commands.clone()
    }

    /// Adopt and register commands, in order.
    ///
    /// Stops at the first failure. A command whose registration fails is
    /// removed again; commands added before it stay registered.
    ///
    /// Registration runs against a staging parent, and only the subcommands
    /// it gains are merged into the root.
    pub fn add<I>(self: &Arc<Self>, commands: I) -> Result<(), CommanderError>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            let command = Arc::new(command);
            let name = command.name().to_string();
            command.attach(self);

            {
                let mut state = self.write();
                if state.commands.contains_key(&name) {
                    return Err(CommanderError::DuplicateCommand(name));
                }
                state.commands.insert(name.clone(), Arc::clone(&command));
            }

            let mut staging = clap::Command::new(self.root_name());
            if let Err(err) = command.register(&mut staging) {
                self.write().commands.remove(&name);
                return Err(err);
            }

            let mut root = self.root.lock().unwrap_or_else(PoisonError::into_inner);
            for node in staging.get_subcommands() {
                *root = root.clone().subcommand(node.clone());
            }
            tracing::debug!(command = %name, "command added");
        }

        Ok(())
    }

    fn root_name(&self) -> String {
        self.root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_name()
            .to_string()
    }

    /// A copy of the root command tree, including every registered subcommand.
    pub fn root(&self) -> clap::Command {
        self.root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register every command with an interactive shell.
    ///
    /// Call after all commands have been added.
    pub fn register_shell<R, W>(&self, shell: &mut Shell<R, W>) {
        for command in self.all().into_values() {
            shell.add_command(command);
        }
    }

    /// Parse `args` against the root command and run the selected command.
    pub fn execute_static<I, T>(&self, args: I) -> Result<(), CommanderError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.root().try_get_matches_from(args)?;
        self.dispatch_static(&matches)
    }

    /// Run the command selected in already parsed root matches.
    pub fn dispatch_static(&self, matches: &ArgMatches) -> Result<(), CommanderError> {
        let (name, sub_matches) = matches.subcommand().ok_or(CommanderError::MissingCommand)?;
        let command = self.cmd(name)?;
        command.handle_static(sub_matches);
        Ok(())
    }
}
