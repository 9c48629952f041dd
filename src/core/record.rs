//! core::record
//!
//! Field-descriptor protocol for request and response records.
//!
//! # Design
//!
//! Request and response types describe their own fields through [`Inspect`].
//! Each field is declared once, with its name, its storage and up to four
//! declarative tags:
//!
//! - `valid` - validation rules; a value starting with `required` marks the
//!   field mandatory
//! - `short` - one-character short flag
//! - `long` - long flag name
//! - `hint` - human-readable description
//!
//! Commands hold records type-erased as `Box<dyn Record>`. [`Record`] is
//! implemented for every `Inspect + Default + Serialize` type, which gives the
//! engine zero-value resets and JSON rendering for free.
//!
//! # Example
//!
//! ```
//! use serde::Serialize;
//! use twofold::core::record::{Field, Inspect};
//!
//! #[derive(Debug, Default, Serialize)]
//! struct GreetRequest {
//!     name: String,
//!     times: i64,
//! }
//!
//! impl Inspect for GreetRequest {
//!     fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
//!         fields.push(
//!             Field::text("name", &mut self.name)
//!                 .valid("required")
//!                 .long("name")
//!                 .short("n")
//!                 .hint("Who to greet"),
//!         );
//!         fields.push(
//!             Field::integer("times", &mut self.times)
//!                 .long("times")
//!                 .hint("Repeat count"),
//!         );
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;

use serde::Serialize;

/// The kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Integer,
    Boolean,
    Float,
    Record,
}

impl Kind {
    /// Lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::Float => "float",
            Kind::Record => "record",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative tags attached to a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    pub valid: Option<&'static str>,
    pub short: Option<&'static str>,
    pub long: Option<&'static str>,
    pub hint: Option<&'static str>,
}

/// Mutable storage behind a declared field.
pub enum Slot<'a> {
    Text(&'a mut String),
    Integer(&'a mut i64),
    Boolean(&'a mut bool),
    Float(&'a mut f64),
    Record(&'a mut dyn Inspect),
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Slot::Text(_) => Kind::Text,
            Slot::Integer(_) => Kind::Integer,
            Slot::Boolean(_) => Kind::Boolean,
            Slot::Float(_) => Kind::Float,
            Slot::Record(_) => Kind::Record,
        }
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Slot::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            Slot::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            Slot::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Slot::Record(_) => f.write_str("Record(..)"),
        }
    }
}

/// One declared field: name, tags and storage.
#[derive(Debug)]
pub struct Field<'a> {
    pub name: &'static str,
    pub tags: Tags,
    pub slot: Slot<'a>,
}

impl<'a> Field<'a> {
    fn with_slot(name: &'static str, slot: Slot<'a>) -> Self {
        Self {
            name,
            tags: Tags::default(),
            slot,
        }
    }

    /// Declare a text field.
    pub fn text(name: &'static str, value: &'a mut String) -> Self {
        Self::with_slot(name, Slot::Text(value))
    }

    /// Declare an integer field.
    pub fn integer(name: &'static str, value: &'a mut i64) -> Self {
        Self::with_slot(name, Slot::Integer(value))
    }

    /// Declare a boolean field.
    pub fn boolean(name: &'static str, value: &'a mut bool) -> Self {
        Self::with_slot(name, Slot::Boolean(value))
    }

    /// Declare a floating point field.
    ///
    /// Floats can be declared but are rejected by the inspector.
    pub fn float(name: &'static str, value: &'a mut f64) -> Self {
        Self::with_slot(name, Slot::Float(value))
    }

    /// Declare a nested record whose fields are inspected recursively.
    pub fn nested(name: &'static str, value: &'a mut dyn Inspect) -> Self {
        Self::with_slot(name, Slot::Record(value))
    }

    pub fn valid(mut self, rules: &'static str) -> Self {
        self.tags.valid = Some(rules);
        self
    }

    pub fn short(mut self, flag: &'static str) -> Self {
        self.tags.short = Some(flag);
        self
    }

    pub fn long(mut self, flag: &'static str) -> Self {
        self.tags.long = Some(flag);
        self
    }

    pub fn hint(mut self, hint: &'static str) -> Self {
        self.tags.hint = Some(hint);
        self
    }
}

/// Capability to enumerate a record's fields.
pub trait Inspect {
    /// Push one [`Field`] per declared field, in declaration order.
    fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>);

    /// Record-level validation run after the required-field check.
    ///
    /// Returns a human-readable reason on failure.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A type-erased request or response record.
pub trait Record: Inspect + Any + Send + 'static {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// A fresh zero-valued instance of the same concrete type.
    fn zeroed(&self) -> Box<dyn Record>;

    /// Serialize the record to a JSON value.
    fn to_json(&self) -> serde_json::Result<serde_json::Value>;

    /// Name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T> Record for T
where
    T: Inspect + Default + Serialize + Any + Send,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn zeroed(&self) -> Box<dyn Record> {
        Box::new(T::default())
    }

    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Record {
    /// Borrow the record as its concrete type.
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the record as its concrete type.
    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl fmt::Debug for dyn Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Serialize, PartialEq)]
    struct Ping {
        host: String,
        count: i64,
    }

    impl Inspect for Ping {
        fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
            fields.push(Field::text("host", &mut self.host).valid("required"));
            fields.push(Field::integer("count", &mut self.count));
        }
    }

    #[test]
    fn zeroed_produces_default_of_same_type() {
        let ping = Ping {
            host: "example.org".into(),
            count: 3,
        };
        let fresh = ping.zeroed();
        assert_eq!(fresh.downcast_ref::<Ping>(), Some(&Ping::default()));
    }

    #[derive(Debug, Default, Serialize)]
    struct Pong {
        elapsed: i64,
    }

    impl Inspect for Pong {
        fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
            fields.push(Field::integer("elapsed", &mut self.elapsed));
        }
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        let boxed: Box<dyn Record> = Box::new(Ping::default());
        assert!(boxed.downcast_ref::<Pong>().is_none());
        assert!(boxed.downcast_ref::<Ping>().is_some());
    }

    #[test]
    fn to_json_serializes_fields() {
        let ping = Ping {
            host: "a".into(),
            count: 2,
        };
        let value = ping.to_json().unwrap();
        assert_eq!(value["host"], "a");
        assert_eq!(value["count"], 2);
    }

    #[test]
    fn builder_sets_tags() {
        let mut value = String::new();
        let field = Field::text("name", &mut value)
            .valid("required")
            .short("n")
            .long("name")
            .hint("Name");
        assert_eq!(
            field.tags,
            Tags {
                valid: Some("required"),
                short: Some("n"),
                long: Some("name"),
                hint: Some("Name"),
            }
        );
        assert_eq!(field.slot.kind(), Kind::Text);
    }
}
