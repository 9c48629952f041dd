//! engine::register
//!
//! Static-mode registration: request fields become clap flags.
//!
//! A field is bound when it carries both a long flag and a hint. Text binds
//! as a `String` value, integers as `i64`; other kinds fail registration.
//! After parsing, [`apply_matches`] copies supplied values back onto the
//! request.

use std::collections::HashSet;

use clap::parser::MatchesError;
use clap::{value_parser, Arg, ArgAction, ArgMatches};

use super::command::Command;
use super::errors::CommanderError;
use crate::core::inspect::{inspect, FieldInfo, Leaf};
use crate::core::record::{Kind, Record};

/// Flag names clap reserves for itself.
const RESERVED_LONG: &[&str] = &["help"];
const RESERVED_SHORT: &[char] = &['h'];

/// Default registration handler.
///
/// Builds the command's subcommand, binds one flag per eligible request
/// field and attaches the subcommand to `parent`.
pub fn default_registration(parent: &mut clap::Command, command: &Command) -> anyhow::Result<()> {
    let mut node = command.static_node();
    {
        let mut exchange = command.exchange();
        let fields = inspect(exchange.request.as_mut())?;
        for arg in bind_flags(&fields)? {
            node = node.arg(arg);
        }
    }
    *parent = std::mem::take(parent).subcommand(node);
    Ok(())
}

/// Build the flags for a set of fields, rejecting clashes.
pub fn bind_flags(fields: &[FieldInfo<'_>]) -> Result<Vec<Arg>, CommanderError> {
    let mut longs: HashSet<&'static str> = RESERVED_LONG.iter().copied().collect();
    let mut shorts: HashSet<char> = RESERVED_SHORT.iter().copied().collect();
    let mut args = Vec::new();

    for field in fields {
        let Some(arg) = flag_for(field)? else {
            continue;
        };
        if let Some(long) = field.long_flag {
            if !longs.insert(long) {
                return Err(CommanderError::DuplicateFlag(format!("--{}", long)));
            }
        }
        if let Some(short) = single_char(field.short_flag) {
            if !shorts.insert(short) {
                return Err(CommanderError::DuplicateFlag(format!("-{}", short)));
            }
        }
        args.push(arg);
    }

    Ok(args)
}

/// The flag for one field, or `None` when the field is not flag-bound.
pub fn flag_for(field: &FieldInfo<'_>) -> Result<Option<Arg>, CommanderError> {
    let (Some(long), Some(hint)) = (field.long_flag, field.hint) else {
        return Ok(None);
    };

    let arg = Arg::new(long)
        .long(long)
        .help(hint)
        .action(ArgAction::Set);
    let arg = match field.kind() {
        Kind::Text => arg.value_parser(value_parser!(String)),
        Kind::Integer => arg
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true),
        kind => {
            return Err(CommanderError::UnhandledType {
                field: field.path(),
                kind,
            })
        }
    };

    Ok(Some(match single_char(field.short_flag) {
        Some(short) => arg.short(short),
        None => arg,
    }))
}

fn single_char(flag: Option<&str>) -> Option<char> {
    let mut chars = flag?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Copy parsed flag values onto the request.
///
/// Flags that were not supplied, or that the matches do not know about,
/// leave their field untouched.
pub fn apply_matches(request: &mut dyn Record, matches: &ArgMatches) -> Result<(), CommanderError> {
    for mut field in inspect(request)? {
        let (Some(flag), Some(_)) = (field.long_flag, field.hint) else {
            continue;
        };
        match field.leaf() {
            Leaf::Text(slot) => {
                if let Some(value) = read::<String>(matches, flag)? {
                    **slot = value.clone();
                }
            }
            Leaf::Integer(slot) => {
                if let Some(value) = read::<i64>(matches, flag)? {
                    **slot = *value;
                }
            }
            Leaf::Boolean(_) => {}
        }
    }
    Ok(())
}

fn read<'m, T>(matches: &'m ArgMatches, flag: &str) -> Result<Option<&'m T>, CommanderError>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    match matches.try_get_one::<T>(flag) {
        Ok(value) => Ok(value),
        Err(MatchesError::UnknownArgument { .. }) => Ok(None),
        Err(err) => Err(CommanderError::FlagValue {
            flag: flag.to_string(),
            message: err.to_string(),
        }),
    }
}
