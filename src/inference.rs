//! Field inference from fetched records.
//!
//! Given a record-like object, infer the field selection that could have
//! fetched it. Arguments are recovered from the property keys they were
//! serialized into (see `calls`).
//!
//! Heuristics, in order, per key:
//! - arrays are plural; children come from the first element only.
//! - objects recurse; scalars and null are leaves.
//! - connection keys gain synthetic children (`node` → `id`, `edges` → `cursor`)
//!   and the identity key's metadata becomes the node-type annotation.
use serde_json::{Map, Value};

use crate::calls::parse_field_key;
use crate::config::{InterfaceConfig, KeyFilter};
use crate::error::InferError;
use crate::ir::{FieldDescriptor, FieldMetadata};

// ------------------------------ Observe ----------------------------------- //

pub struct FieldInference<'a, K: KeyFilter + ?Sized> {
    interface: &'a InterfaceConfig,
    reserved: &'a K,
}

impl<'a, K: KeyFilter + ?Sized> FieldInference<'a, K> {
    pub fn new(interface: &'a InterfaceConfig, reserved: &'a K) -> Self {
        Self { interface, reserved }
    }

    /// One descriptor per non-reserved key, in key order. The first malformed
    /// key aborts the whole call.
    pub fn infer(&self, data: &Map<String, Value>) -> Result<Vec<FieldDescriptor>, InferError> {
        let fields = data
            .iter()
            .filter(|(key, _)| !self.reserved.is_reserved(key))
            .map(|(key, value)| self.infer_field(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(fields = fields.len(), "inferred record fields");
        Ok(fields)
    }

    fn infer_field(&self, key: &str, value: &Value) -> Result<FieldDescriptor, InferError> {
        let mut metadata = FieldMetadata::default();
        let mut children = match value {
            Value::Array(xs) => {
                metadata.plural = true;
                match xs.first() {
                    Some(Value::Object(element)) => self.infer(element)?,
                    _ => Vec::new(),
                }
            }
            Value::Object(record) => self.infer(record)?,
            _ => Vec::new(),
        };

        let interface = self.interface;
        if key == interface.page_node_key {
            children.push(FieldDescriptor::build(
                "id",
                None,
                Vec::new(),
                FieldMetadata { plural: false, parent_type: Some(interface.node_type_tag.clone()) },
            ));
        } else if key == interface.edge_collection_key {
            children.push(FieldDescriptor::leaf("cursor"));
        } else if key == interface.identity_key {
            // replaces the plural flag too
            metadata = FieldMetadata { plural: false, parent_type: Some(interface.node_type_tag.clone()) };
        }

        let parsed = parse_field_key(key)?;
        Ok(FieldDescriptor::build(parsed.name, parsed.calls, children, metadata))
    }
}

// ------------------------------- Front API -------------------------------- //

/// Infer the fields that could be used to fetch `data`.
pub fn infer_fields_from_data<K: KeyFilter + ?Sized>(
    data: &Map<String, Value>,
    interface: &InterfaceConfig,
    reserved: &K,
) -> Result<Vec<FieldDescriptor>, InferError> {
    FieldInference::new(interface, reserved).infer(data)
}

// ------------------------------- Tests ------------------------------------ //
