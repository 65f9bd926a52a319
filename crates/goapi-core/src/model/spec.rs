use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operations::Operation;
use super::schema::SchemaNode;

/// The finalized specification handed over by the schema transformer.
///
/// `schemas` is the arena of named schemas; every `$ref` in the graph points
/// into it by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Spec {
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Resolves a `$ref` string to the schema it names.
pub trait SchemaLookup {
    fn lookup(&self, reference: &str) -> Option<&SchemaNode>;
}

impl SchemaLookup for Spec {
    fn lookup(&self, reference: &str) -> Option<&SchemaNode> {
        self.schemas.get(ref_name(reference)?)
    }
}

impl SchemaLookup for IndexMap<String, SchemaNode> {
    fn lookup(&self, reference: &str) -> Option<&SchemaNode> {
        self.get(ref_name(reference)?)
    }
}

/// The schema name a reference points at: its last non-empty path segment.
///
/// `#/components/schemas/Pet` → `Pet`, `common.yaml#/Money` → `Money`.
pub fn ref_name(reference: &str) -> Option<&str> {
    reference.rsplit(['/', '#']).find(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchemaType;

    #[test]
    fn test_ref_name() {
        assert_eq!(ref_name("#/components/schemas/Pet"), Some("Pet"));
        assert_eq!(ref_name("common.yaml#/Money"), Some("Money"));
        assert_eq!(ref_name("#/components/schemas/Pet/"), Some("Pet"));
        assert_eq!(ref_name("Pet"), Some("Pet"));
        assert_eq!(ref_name(""), None);
        assert_eq!(ref_name("#/"), None);
    }

    #[test]
    fn lookup_by_last_segment() {
        let mut spec = Spec::default();
        spec.schemas.insert(
            "my_pet".to_string(),
            SchemaNode::of_type(SchemaType::Object),
        );
        assert!(spec.lookup("#/components/schemas/my_pet").is_some());
        assert!(spec.lookup("#/components/schemas/Other").is_none());
    }
}
