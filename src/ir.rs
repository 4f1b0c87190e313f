// Inferred field-selection tree. No serde_json::Value here.

use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Decoded argument value: booleans, numbers, strings, and flat lists of those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallValue {
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<CallValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallArg {
    pub name: String,
    pub value: CallValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub plural: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calls: Option<Vec<CallArg>>,
    #[serde(default)]
    pub children: Vec<FieldDescriptor>,
    #[serde(default)]
    pub metadata: FieldMetadata,
}

// ------------------------------ Builders ---------------------------------- //

impl CallValue {
    /// Legacy call arguments: one part stays a scalar, several become a list.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts: Vec<CallValue> = parts
            .into_iter()
            .map(|s| CallValue::String(s.into()))
            .collect();
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            CallValue::List(parts)
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CallValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn write_literal(&self, out: &mut String, sep: &str) {
        match self {
            CallValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            CallValue::Number(n) => out.push_str(&n.to_string()),
            // serde_json string escaping is exactly what the argument grammar reads back
            CallValue::String(s) => out.push_str(&serde_json::Value::from(s.as_str()).to_string()),
            CallValue::List(xs) => {
                out.push('[');
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 { out.push_str(sep); }
                    x.write_literal(out, sep);
                }
                out.push(']');
            }
        }
    }
}

impl CallArg {
    pub fn new(name: impl Into<String>, value: CallValue) -> Self {
        Self { name: name.into(), value }
    }
}

impl FieldDescriptor {
    pub fn build(
        name: impl Into<String>,
        calls: Option<Vec<CallArg>>,
        children: Vec<FieldDescriptor>,
        metadata: FieldMetadata,
    ) -> Self {
        Self { name: name.into(), calls, children, metadata }
    }

    /// Bare leaf field, e.g. the synthetic `cursor` of an edge.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::build(name, None, Vec::new(), FieldMetadata::default())
    }

    pub fn is_plural(&self) -> bool { self.metadata.plural }

    pub fn has_calls(&self) -> bool {
        self.calls.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn get_child(&self, name: &str) -> Option<&FieldDescriptor> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Modern key encoding, `name(arg:value,...)`. Feeding it back through
    /// `calls::parse_field_key` yields the same name and calls.
    pub fn serialization_key(&self) -> String {
        let mut out = self.name.clone();
        if let Some(calls) = self.calls.as_ref().filter(|c| !c.is_empty()) {
            out.push('(');
            for (i, call) in calls.iter().enumerate() {
                if i > 0 { out.push(','); }
                out.push_str(&call.name);
                out.push(':');
                call.value.write_literal(&mut out, ",");
            }
            out.push(')');
        }
        out
    }

    /// Flat storage slot: the bare name, or an alias when arguments are present.
    pub fn storage_key(&self) -> String {
        if self.has_calls() {
            crate::alias::generate_alias(&self.serialization_key())
        } else {
            self.name.clone()
        }
    }

    fn write_selection(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}{}", self.name)?;
        if let Some(calls) = self.calls.as_ref().filter(|c| !c.is_empty()) {
            let args = calls
                .iter()
                .map(|c| {
                    let mut v = String::new();
                    c.value.write_literal(&mut v, ", ");
                    format!("{}: {v}", c.name)
                })
                .collect::<Vec<_>>();
            write!(f, "({})", args.join(", "))?;
        }
        if !self.children.is_empty() {
            writeln!(f, " {{")?;
            for child in &self.children {
                child.write_selection(f, depth + 1)?;
                writeln!(f)?;
            }
            write!(f, "{indent}}}")?;
        }
        Ok(())
    }
}

/// GraphQL-like selection, children indented two spaces per level.
impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_selection(f, 0)
    }
}

// ------------------------------- Tests ------------------------------------ //
