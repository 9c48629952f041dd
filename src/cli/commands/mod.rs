//! cli::commands
//!
//! Demo commands shipped with the binary.
//!
//! # Architecture
//!
//! Each command module defines:
//! 1. A request record whose fields become flags and prompts
//! 2. A response record rendered by the response handler
//! 3. A request handler turning one into the other
//!
//! [`install`] adds them all to a commander.

mod greet;
mod sum;

use std::sync::Arc;

pub use greet::{GreetRequest, GreetResponse};
pub use sum::{Operands, SumRequest, SumResponse};

use crate::engine::{Commander, CommanderError};

/// Register every demo command.
pub fn install(commander: &Arc<Commander>) -> Result<(), CommanderError> {
    commander.add([greet::command(), sum::command()])
}
