//! Field-selection inference and alias generation for cached records.
//!
//! - [`inference`] rebuilds the field tree that would have fetched a record.
//! - [`calls`] decodes the arguments serialized into data keys.
//! - [`alias`] maps field keys to flat, collision-resistant storage slots.
pub mod alias;
pub mod calls;
pub mod config;
pub mod error;
pub mod inference;
pub mod ir;
pub mod path_de;

pub use alias::generate_alias;
pub use calls::{classify_key, parse_arguments, parse_field_key, KeyForm, ParsedKey};
pub use config::{Config, InterfaceConfig, KeyFilter, MetadataKeys};
pub use error::{ArgumentError, InferError};
pub use inference::{infer_fields_from_data, FieldInference};
pub use ir::{CallArg, CallValue, FieldDescriptor, FieldMetadata};
