//! sum command - Add two integers

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::record::{Field, Inspect, Record};
use crate::engine::Command;

#[derive(Debug, Default, Serialize)]
pub struct Operands {
    pub left: i64,
    pub right: i64,
}

impl Inspect for Operands {
    fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
        fields.push(
            Field::integer("left", &mut self.left)
                .valid("required")
                .short("l")
                .long("left")
                .hint("First operand"),
        );
        fields.push(
            Field::integer("right", &mut self.right)
                .valid("required")
                .short("r")
                .long("right")
                .hint("Second operand"),
        );
    }
}

#[derive(Debug, Default, Serialize)]
pub struct SumRequest {
    pub operands: Operands,
    pub label: String,
}

impl Inspect for SumRequest {
    fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
        fields.push(Field::nested("operands", &mut self.operands));
        fields.push(
            Field::text("label", &mut self.label)
                .long("label")
                .hint("Label attached to the result"),
        );
    }
}

#[derive(Debug, Default, Serialize)]
pub struct SumResponse {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    pub total: i64,
}

impl Inspect for SumResponse {
    fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
        fields.push(Field::text("label", &mut self.label));
        fields.push(Field::integer("total", &mut self.total));
    }
}

pub(super) fn command() -> Command {
    Command::new("sum", SumRequest::default(), SumResponse::default())
        .about("Add two integers")
        .with_request_handler(sum)
}

fn sum(request: &mut dyn Record, response: &mut dyn Record) -> Result<()> {
    let request = request
        .downcast_ref::<SumRequest>()
        .context("sum received an unexpected request type")?;
    let response = response
        .downcast_mut::<SumResponse>()
        .context("sum received an unexpected response type")?;

    let Operands { left, right } = request.operands;
    response.total = left
        .checked_add(right)
        .with_context(|| format!("{} + {} overflows", left, right))?;
    response.label = request.label.clone();
    Ok(())
}
