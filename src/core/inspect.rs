//! core::inspect
//!
//! Structural field inspector.
//!
//! # Algorithm
//!
//! [`inspect`] walks a record depth-first in declaration order and flattens
//! every primitive leaf into a [`FieldInfo`]:
//!
//! - Nested records recurse; their leaves carry the `->`-joined chain of
//!   enclosing field names as namespace.
//! - Text, integer and boolean leaves are captured with their tags.
//! - Fields in [`EXCLUDED_FIELDS`] are skipped and consume no index.
//! - Any other kind fails the whole walk with [`InspectError::UnsupportedKind`].
//!
//! A single counter is threaded through the recursion, so indices follow
//! first-encounter order regardless of nesting depth.
//!
//! # Example
//!
//! ```
//! use serde::Serialize;
//! use twofold::core::inspect::inspect;
//! use twofold::core::record::{Field, Inspect};
//!
//! #[derive(Default, Serialize)]
//! struct Address {
//!     city: String,
//! }
//!
//! impl Inspect for Address {
//!     fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
//!         fields.push(Field::text("city", &mut self.city));
//!     }
//! }
//!
//! #[derive(Default, Serialize)]
//! struct Signup {
//!     name: String,
//!     address: Address,
//! }
//!
//! impl Inspect for Signup {
//!     fn fields<'a>(&'a mut self, fields: &mut Vec<Field<'a>>) {
//!         fields.push(Field::text("name", &mut self.name).valid("required"));
//!         fields.push(Field::nested("address", &mut self.address));
//!     }
//! }
//!
//! let mut signup = Signup::default();
//! let fields = inspect(&mut signup).unwrap();
//! assert_eq!(fields.len(), 2);
//! assert_eq!(fields[1].path(), "address->city");
//! assert!(fields[0].required);
//! ```

use thiserror::Error;

use super::record::{Field, Inspect, Kind, Slot};

/// Field names reserved for serializer bookkeeping; never exposed.
pub const EXCLUDED_FIELDS: &[&str] = &["xml_name", "$value", "$text"];

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: &str = "->";

/// Errors from inspection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InspectError {
    #[error("unsupported kind: {kind} (field '{field}')")]
    UnsupportedKind { field: String, kind: Kind },
}

/// Errors from assigning user input to a field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("failed to convert user input to integer: '{0}'")]
    InvalidInteger(String),

    #[error("unsupported value type: {0}")]
    UnsupportedValue(Kind),
}

/// Mutable reference to a primitive leaf.
#[derive(Debug)]
pub enum Leaf<'a> {
    Text(&'a mut String),
    Integer(&'a mut i64),
    Boolean(&'a mut bool),
}

impl Leaf<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Leaf::Text(_) => Kind::Text,
            Leaf::Integer(_) => Kind::Integer,
            Leaf::Boolean(_) => Kind::Boolean,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Leaf::Text(v) => v.is_empty(),
            Leaf::Integer(v) => **v == 0,
            Leaf::Boolean(v) => !**v,
        }
    }
}

/// Metadata for one leaf field, plus a handle to its storage.
#[derive(Debug)]
pub struct FieldInfo<'a> {
    /// Flattened position in the inspection pass.
    pub index: usize,
    /// Enclosing record names joined by `->`; empty at the top level.
    pub namespace: String,
    pub name: &'static str,
    pub required: bool,
    /// Whether the value equaled its type's zero value at inspection time.
    pub zero: bool,
    pub valid: Option<&'static str>,
    pub hint: Option<&'static str>,
    pub short_flag: Option<&'static str>,
    pub long_flag: Option<&'static str>,
    leaf: Leaf<'a>,
}

impl<'a> FieldInfo<'a> {
    pub fn kind(&self) -> Kind {
        self.leaf.kind()
    }

    /// Namespace and name, e.g. `address->city`.
    pub fn path(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, self.name)
        }
    }

    /// The storage behind this field.
    pub fn leaf(&mut self) -> &mut Leaf<'a> {
        &mut self.leaf
    }

    /// Assign a line of user input.
    ///
    /// Text is stored verbatim. Integers must parse as `i64`; out-of-range
    /// values are rejected. Booleans are not assignable from input.
    pub fn assign(&mut self, input: &str) -> Result<(), AssignError> {
        match &mut self.leaf {
            Leaf::Text(slot) => {
                **slot = input.to_string();
            }
            Leaf::Integer(slot) => {
                **slot = input
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AssignError::InvalidInteger(input.to_string()))?;
            }
            Leaf::Boolean(_) => return Err(AssignError::UnsupportedValue(Kind::Boolean)),
        }
        self.zero = self.leaf.is_zero();
        Ok(())
    }
}

/// Inspect a record and return its flattened leaf fields.
pub fn inspect<R>(record: &mut R) -> Result<Vec<FieldInfo<'_>>, InspectError>
where
    R: Inspect + ?Sized,
{
    let mut index = 0;
    let mut infos = Vec::new();
    walk(record, "", &mut index, &mut infos)?;
    Ok(infos)
}

fn walk<'a, R>(
    record: &'a mut R,
    namespace: &str,
    index: &mut usize,
    infos: &mut Vec<FieldInfo<'a>>,
) -> Result<(), InspectError>
where
    R: Inspect + ?Sized,
{
    let mut fields: Vec<Field<'a>> = Vec::new();
    record.fields(&mut fields);

    for field in fields {
        if EXCLUDED_FIELDS.contains(&field.name) {
            continue;
        }

        let leaf = match field.slot {
            Slot::Record(child) => {
                let child_ns = if namespace.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, field.name)
                };
                walk(child, &child_ns, index, infos)?;
                continue;
            }
            Slot::Text(v) => Leaf::Text(v),
            Slot::Integer(v) => Leaf::Integer(v),
            Slot::Boolean(v) => Leaf::Boolean(v),
            Slot::Float(_) => {
                return Err(InspectError::UnsupportedKind {
                    field: field.name.to_string(),
                    kind: Kind::Float,
                })
            }
        };

        let tags = field.tags;
        infos.push(FieldInfo {
            index: *index,
            namespace: namespace.to_string(),
            name: field.name,
            required: tags.valid.is_some_and(|rules| rules.starts_with("required")),
            zero: leaf.is_zero(),
            valid: tags.valid,
            hint: tags.hint,
            short_flag: tags.short,
            long_flag: tags.long,
            leaf,
        });
        *index += 1;
    }

    Ok(())
}

/// Partition fields into required and optional, keeping encounter order.
pub fn split_required_fields<'a>(
    fields: Vec<FieldInfo<'a>>,
) -> (Vec<FieldInfo<'a>>, Vec<FieldInfo<'a>>) {
    fields.into_iter().partition(|field| field.required)
}
