//! core
//!
//! Record protocol, inspection, validation and configuration.
//!
//! # Modules
//!
//! - [`record`] - The `Inspect` field-descriptor protocol and `Record` objects
//! - [`inspect`] - Flattening a record into `FieldInfo` entries
//! - [`validate`] - Required-field and record-level validation
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Records describe their own fields; nothing is discovered at runtime
//! - Schemas are strict and self-describing

pub mod config;
pub mod inspect;
pub mod record;
pub mod validate;
