//! greet command - Build a greeting for a name

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::record::{Field, Inspect, Record};
use crate::engine::Command;

const DEFAULT_GREETING: &str = "Hello";

#[derive(Debug, Default, Serialize)]
pub struct GreetRequest {
    pub name: String,
    pub greeting: String,
    pub times: i64,
}

impl Inspect for GreetRequest {
    fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
        fields.push(
            Field::text("name", &mut self.name)
                .valid("required")
                .short("n")
                .long("name")
                .hint("Who to greet"),
        );
        fields.push(
            Field::text("greeting", &mut self.greeting)
                .short("g")
                .long("greeting")
                .hint("Greeting word (default: Hello)"),
        );
        fields.push(
            Field::integer("times", &mut self.times)
                .long("times")
                .hint("Repeat the greeting this many times"),
        );
    }

    fn validate(&self) -> Result<(), String> {
        if self.times < 0 {
            return Err(format!("times must not be negative, got {}", self.times));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize)]
pub struct GreetResponse {
    pub message: String,
}

impl Inspect for GreetResponse {
    fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
        fields.push(Field::text("message", &mut self.message));
    }
}

pub(super) fn command() -> Command {
    Command::new("greet", GreetRequest::default(), GreetResponse::default())
        .about("Say hello")
        .long_about("Build a greeting for NAME, with an optional greeting word and repeat count.")
        .with_request_handler(greet)
}

fn greet(request: &mut dyn Record, response: &mut dyn Record) -> Result<()> {
    let request = request
        .downcast_ref::<GreetRequest>()
        .context("greet received an unexpected request type")?;
    let response = response
        .downcast_mut::<GreetResponse>()
        .context("greet received an unexpected response type")?;

    let word = if request.greeting.is_empty() {
        DEFAULT_GREETING
    } else {
        request.greeting.as_str()
    };
    let line = format!("{}, {}!", word, request.name);
    let times = usize::try_from(request.times.max(1)).unwrap_or(1);
    response.message = vec![line; times].join(" ");
    Ok(())
}
