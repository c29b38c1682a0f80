//! Runtime discovery of the MPlayer slave-mode vocabulary.
//!
//! MPlayer prints its supported commands (`-input cmdlist`) and properties
//! (`-list-properties`) as semi-structured text. This crate parses those two
//! listings into typed, immutable descriptors and bundles them as a
//! [`Schema`] — one discovery pass can seed any number of player instances.
//!
//! Unrecognized lines are skipped (the vocabulary evolves ahead of this
//! library); malformed *recognized* lines are hard errors.

pub mod descriptor;
pub mod error;
pub mod schema;
pub mod types;

pub use descriptor::{CommandDescriptor, PropertyDescriptor};
pub use error::{Result, SchemaError};
pub use schema::{
    discover_commands, discover_properties, parse_command_line, parse_property_line, Schema,
    CMDLIST_ARGS, PROPERTY_LIST_ARGS,
};
pub use types::{Value, ValueType};
