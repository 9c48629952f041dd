//! engine::static_flow
//!
//! Default static-mode execution: validate, request, response.
//!
//! The exec receives the invocation's own exchange with flag values already
//! copied onto the request.

use anyhow::Context;
use clap::ArgMatches;

use super::command::{Command, Exchange};
use crate::core::validate::validate;

/// Default static exec.
pub fn generic_static_exec(
    command: &Command,
    exchange: &mut Exchange,
    _matches: &ArgMatches,
) -> anyhow::Result<()> {
    let Exchange { request, response } = exchange;

    validate(request.as_mut()).context("validation error")?;
    command.handle_request(request.as_mut(), response.as_mut())?;
    command.handle_response(response.as_ref())?;
    Ok(())
}
