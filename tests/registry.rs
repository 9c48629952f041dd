//! Integration tests for the commander registry.
//!
//! Covers lookup, handler resolution, hook ordering and error routing, and
//! concurrent registration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use serde::Serialize;

use twofold::core::record::{Field, Inspect, Record};
use twofold::engine::{
    report_error_handler, Command, CommandHook, Commander, CommanderError, Defaults, Level,
    RequestHandler,
};
use twofold::ui::shell::Shell;

#[derive(Debug, Default, Serialize)]
struct Blank {}

impl Inspect for Blank {
    fn fields<'a>(&'a mut self, _fields: &mut Vec<Field<'a>>) {}
}

fn blank(name: &str) -> Command {
    Command::new(name.to_string(), Blank::default(), Blank::default())
}

fn recovering() -> Arc<Commander> {
    Commander::with_defaults(
        clap::Command::new("app"),
        Defaults {
            error: report_error_handler(),
            ..Defaults::default()
        },
    )
}

fn noop_request_handler() -> RequestHandler {
    Arc::new(|_: &mut dyn Record, _: &mut dyn Record| -> anyhow::Result<()> { Ok(()) })
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn every_added_command_is_found_once() {
    let commander = recovering();
    let names = ["alpha", "beta", "gamma", "delta"];
    for name in names {
        commander.add([blank(name)]).unwrap();
    }

    let all = commander.all();
    assert_eq!(all.len(), names.len());
    for name in names {
        let found = commander.cmd(name).unwrap();
        assert_eq!(found.name(), name);
        assert!(Arc::ptr_eq(&found, &all[name]));
    }
}

#[test]
fn adding_a_taken_name_keeps_the_original() {
    let commander = recovering();
    commander.add([blank("alpha").about("original")]).unwrap();

    let err = commander.add([blank("alpha").about("impostor")]).unwrap_err();
    assert!(matches!(err, CommanderError::DuplicateCommand(name) if name == "alpha"));
    assert_eq!(commander.cmd("alpha").unwrap().short_desc(), "original");
    assert_eq!(commander.all().len(), 1);
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn override_wins_regardless_of_global() {
    let commander = recovering();
    commander
        .add([
            blank("local").with_request_handler(|_, _| Ok(())),
            blank("plain"),
        ])
        .unwrap();
    let local = commander.cmd("local").unwrap();
    let plain = commander.cmd("plain").unwrap();

    assert_eq!(local.resolve_request_handler().unwrap().0, Level::Command);
    assert!(plain.resolve_request_handler().is_err());

    commander.set_default_request_handler(Some(noop_request_handler()));
    assert_eq!(local.resolve_request_handler().unwrap().0, Level::Command);
    assert_eq!(plain.resolve_request_handler().unwrap().0, Level::Commander);

    commander.set_default_request_handler(None);
    assert!(plain.resolve_request_handler().is_err());
}

#[test]
fn clearing_an_override_falls_back_to_global() {
    let commander = recovering();
    commander.set_default_request_handler(Some(noop_request_handler()));
    commander
        .add([blank("local").with_request_handler(|_, _| Ok(()))])
        .unwrap();
    let local = commander.cmd("local").unwrap();

    local.set_request_handler(None);
    assert_eq!(local.resolve_request_handler().unwrap().0, Level::Commander);
}

#[test]
fn command_error_handler_overrides_commander() {
    let commander_errors = Arc::new(AtomicUsize::new(0));
    let command_errors = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&commander_errors);
    let commander = recovering();
    commander.set_error_handler(Arc::new(move |_: &anyhow::Error| {
        seen.fetch_add(1, Ordering::SeqCst);
    }));

    let seen = Arc::clone(&command_errors);
    commander
        .add([
            blank("own").with_error_handler(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            blank("shared"),
        ])
        .unwrap();

    let failure = anyhow::anyhow!("boom");
    commander.cmd("own").unwrap().handle_error(&failure);
    commander.cmd("shared").unwrap().handle_error(&failure);
    commander.handle_error(&failure);

    assert_eq!(command_errors.load(Ordering::SeqCst), 1);
    assert_eq!(commander_errors.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Hooks
// =============================================================================

fn recording_hook(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> CommandHook {
    let log = Arc::clone(log);
    Arc::new(move |command: &Command| -> anyhow::Result<()> {
        log.lock().unwrap().push(format!("{}:{}", label, command.name()));
        Ok(())
    })
}

#[test]
fn hooks_wrap_static_execution_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let commander = recovering();
    commander.add_pre_request_hooks([recording_hook(&log, "pre1"), recording_hook(&log, "pre2")]);
    commander.add_post_request_hooks([recording_hook(&log, "post")]);

    let exec_log = Arc::clone(&log);
    commander
        .add([blank("run").with_static_exec(move |command, _, _| {
            exec_log.lock().unwrap().push(format!("exec:{}", command.name()));
            Ok(())
        })])
        .unwrap();

    commander.execute_static(["app", "run"]).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["pre1:run", "pre2:run", "exec:run", "post:run"]
    );
}

#[test]
fn failing_hook_is_reported_and_execution_continues() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let commander = recovering();
    commander.set_error_handler(Arc::new(move |err: &anyhow::Error| {
        sink.lock().unwrap().push(err.to_string());
    }));
    commander.add_pre_request_hooks([Arc::new(|_: &Command| -> anyhow::Result<()> {
        Err(anyhow::anyhow!("audit log unavailable"))
    }) as CommandHook]);

    let runs = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&runs);
    commander
        .add([blank("run").with_shell_exec(move |_, _, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })])
        .unwrap();

    let mut shell = Shell::new(std::io::Cursor::new(b"run\nexit\n".to_vec()), Vec::new());
    commander.register_shell(&mut shell);
    shell.run().unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(*errors.lock().unwrap(), vec!["audit log unavailable"]);
}

#[test]
fn register_shell_exposes_every_command() {
    let commander = recovering();
    commander.add([blank("b"), blank("a"), blank("c")]).unwrap();
    let mut shell = Shell::new(std::io::empty(), Vec::<u8>::new());
    commander.register_shell(&mut shell);
    assert_eq!(shell.command_names().collect::<Vec<_>>(), ["a", "b", "c"]);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_registration_and_lookup() {
    let commander = recovering();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let commander = Arc::clone(&commander);
            thread::spawn(move || {
                let name = format!("cmd{}", i);
                commander.add([blank(&name)]).unwrap();
                assert_eq!(commander.cmd(&name).unwrap().name(), name);
                commander.set_default_request_handler(Some(noop_request_handler()));
                commander.all().len()
            })
        })
        .collect();

    for handle in handles {
        let seen = handle.join().unwrap();
        assert!((1..=8).contains(&seen));
    }

    assert_eq!(commander.all().len(), 8);
    let root = commander.root();
    for i in 0..8 {
        assert!(root.find_subcommand(format!("cmd{}", i)).is_some());
    }
}

#[derive(Debug, Default, Serialize)]
struct Named {
    name: String,
}

impl Inspect for Named {
    fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
        fields.push(
            Field::text("name", &mut self.name)
                .valid("required")
                .long("name")
                .hint("Name"),
        );
    }
}

#[test]
fn simultaneous_static_invocations_keep_their_own_flags() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let commander = recovering();
    commander.set_default_response_handler(Some(Arc::new(
        move |resp: &dyn Record| -> anyhow::Result<()> {
            let name = resp.downcast_ref::<Named>().unwrap().name.clone();
            sink.lock().unwrap().push(name);
            Ok(())
        },
    )));

    // Both invocations have applied their flags before either dispatches.
    let barrier = Arc::new(Barrier::new(2));
    let gate = Arc::clone(&barrier);
    commander.add_pre_request_hooks([Arc::new(move |_: &Command| -> anyhow::Result<()> {
        gate.wait();
        Ok(())
    }) as CommandHook]);

    commander
        .add([Command::new("greet", Named::default(), Named::default())
            .with_request_handler(|req, resp| {
                let name = req.downcast_ref::<Named>().unwrap().name.clone();
                resp.downcast_mut::<Named>().unwrap().name = name;
                Ok(())
            })])
        .unwrap();

    let handles: Vec<_> = ["--name=Ada", "--name=Bob"]
        .into_iter()
        .map(|flag| {
            let commander = Arc::clone(&commander);
            thread::spawn(move || commander.execute_static(["app", "greet", flag]).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut names = seen.lock().unwrap().clone();
    names.sort();
    assert_eq!(names, ["Ada", "Bob"]);
}
