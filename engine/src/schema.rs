//! Collection kinds and their merge policies.
//!
//! Every tracked collection has a schema naming the fields the merger treats
//! specially: the heavy field protected from accidental loss, and the primary
//! content field used as evidence of a genuine edit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The collections tracked in canonical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Recipes,
    Groceries,
}

impl CollectionKind {
    /// All kinds, in the order the pipeline processes them.
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Recipes, CollectionKind::Groceries];

    /// Lowercase name, as used on the wire and in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Recipes => "recipes",
            CollectionKind::Groceries => "groceries",
        }
    }

    /// The merge policy for this kind.
    pub fn schema(&self) -> CollectionSchema {
        match self {
            CollectionKind::Recipes => CollectionSchema::new("instructions").with_heavy_field("image"),
            CollectionKind::Groceries => CollectionSchema::new("name"),
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recipes" => Ok(CollectionKind::Recipes),
            "groceries" => Ok(CollectionKind::Groceries),
            other => Err(format!("unknown collection: {other}")),
        }
    }
}

/// Merge policy for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    /// Field whose presence marks a record as a real content edit
    pub content_field: String,
    /// Field protected by the anti-data-loss rule, if any
    pub heavy_field: Option<String>,
}

impl CollectionSchema {
    /// Create a schema with no heavy field.
    pub fn new(content_field: impl Into<String>) -> Self {
        Self {
            content_field: content_field.into(),
            heavy_field: None,
        }
    }

    /// Builder method to protect a heavy field.
    pub fn with_heavy_field(mut self, field: impl Into<String>) -> Self {
        self.heavy_field = Some(field.into());
        self
    }
}

/// Whether a field value counts as populated.
///
/// Missing, `null`, empty strings, empty arrays and empty objects are all
/// treated as absent.
pub fn is_populated(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}
