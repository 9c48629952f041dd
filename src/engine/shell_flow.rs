//! engine::shell_flow
//!
//! Default shell-mode execution.
//!
//! # States
//!
//! ```text
//! CollectRequired -> OfferOptional (loop) -> Dispatch -> Done
//! ```
//!
//! The exec receives a fresh exchange for the invocation. Required fields are
//! prompted in encounter order; the optional menu repeats until the user
//! picks `0`. A value that cannot be assigned aborts the flow before any
//! handler runs.

use super::command::{Command, Exchange};
use crate::core::inspect::{inspect, split_required_fields};
use crate::ui::prompts::{collect_value, present_options, ShellContext};

/// Default shell exec.
pub fn generic_shell_exec(
    command: &Command,
    exchange: &mut Exchange,
    ctx: &mut dyn ShellContext,
) -> anyhow::Result<()> {
    let Exchange { request, response } = exchange;

    {
        let (mut required, mut optional) = split_required_fields(inspect(request.as_mut())?);

        for field in required.iter_mut() {
            collect_value(ctx, field)?;
        }

        while let Some(choice) = present_options(ctx, &optional)? {
            collect_value(ctx, &mut optional[choice])?;
        }
    }

    command.handle_request(request.as_mut(), response.as_mut())?;
    command.handle_response(response.as_ref())?;
    Ok(())
}
