//! Schema-interface constants and the reserved-key predicate.
//!
//! Both come from the store layer; neither is global. A JSON config file may
//! override any of them:
//!
//! ```json
//! { "interface": { "pageNodeKey": "node", "nodeTypeTag": "Node" },
//!   "metadataKeys": ["__dataID__", "__range__"] }
//! ```
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Connection and node interface names that trigger synthetic children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct InterfaceConfig {
    /// Key of the node inside a connection edge; gains a synthetic `id`.
    pub page_node_key: String,
    /// Key of the edge list of a connection; gains a synthetic `cursor`.
    pub edge_collection_key: String,
    /// Identity field; annotated with the node type.
    pub identity_key: String,
    pub node_type_tag: String,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            page_node_key: "node".into(),
            edge_collection_key: "edges".into(),
            identity_key: "id".into(),
            node_type_tag: "Node".into(),
        }
    }
}

// ---------------------------- Reserved keys ------------------------------- //

/// Decides which record keys are store bookkeeping rather than data.
pub trait KeyFilter {
    fn is_reserved(&self, key: &str) -> bool;
}

impl<F> KeyFilter for F
where
    F: Fn(&str) -> bool,
{
    fn is_reserved(&self, key: &str) -> bool { self(key) }
}

const DEFAULT_METADATA_KEYS: &[&str] = &[
    "__dataID__",
    "__range__",
    "__path__",
    "__status__",
    "__resolvedFragmentMap__",
    "__resolvedFragmentMapGeneration__",
    "__resolvedDeferredFragments__",
    "__forceIndex__",
    "__mutationStatus__",
];

/// Exact-match set of store metadata keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataKeys(IndexSet<String>);

impl MetadataKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for MetadataKeys {
    fn default() -> Self { Self::new(DEFAULT_METADATA_KEYS.iter().copied()) }
}

impl KeyFilter for MetadataKeys {
    fn is_reserved(&self, key: &str) -> bool { self.0.contains(key) }
}

// ------------------------------- Loading ---------------------------------- //

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub interface: InterfaceConfig,
    pub metadata_keys: MetadataKeys,
}

impl Config {
    pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
        crate::path_de::from_str_with_path::<Self>(src).map_err(anyhow::Error::msg)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&src)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

// ------------------------------- Tests ------------------------------------ //
