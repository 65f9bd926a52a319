use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// Discriminator for oneOf/anyOf polymorphism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,
    /// Literal value → `$ref` of the variant it selects.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// An import required by a `go-type` override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeImport {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Per-node code generation overrides (`x-go`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SchemaExtensions {
    /// Replaces the resolved type verbatim, e.g. `time.Duration`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub go_type: Option<String>,
    #[serde(rename = "type-import", skip_serializing_if = "Option::is_none")]
    pub go_type_import: Option<TypeImport>,
    /// Replaces the generated field identifier.
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub go_name: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extra_tags: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omit_empty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omit_zero: Option<bool>,
    pub json_ignore: bool,
}

/// One node of the canonical schema graph.
///
/// Children are owned; references to named schemas stay as `$ref` strings and
/// are resolved by name through a [`SchemaLookup`](super::SchemaLookup).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<SchemaNode>>,

    // Array items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(rename = "x-go", default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<SchemaExtensions>,
}

/// The classification of a node, in resolution precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaKind<'a> {
    Reference(&'a str),
    OneOf(&'a [SchemaNode]),
    AnyOf(&'a [SchemaNode]),
    AllOf(&'a [SchemaNode]),
    Enum(&'a [serde_json::Value]),
    String,
    Integer,
    Number,
    Boolean,
    Array(Option<&'a SchemaNode>),
    Object,
    Unknown,
}

impl SchemaNode {
    /// Classify the node: reference, then oneOf, anyOf, allOf, enum, then the
    /// declared (or implied) type.
    pub fn kind(&self) -> SchemaKind<'_> {
        if let Some(reference) = self.reference.as_deref() {
            return SchemaKind::Reference(reference);
        }
        if !self.one_of.is_empty() {
            return SchemaKind::OneOf(&self.one_of);
        }
        if !self.any_of.is_empty() {
            return SchemaKind::AnyOf(&self.any_of);
        }
        if !self.all_of.is_empty() {
            return SchemaKind::AllOf(&self.all_of);
        }
        if !self.enum_values.is_empty() {
            return SchemaKind::Enum(&self.enum_values);
        }
        match self.schema_type {
            Some(SchemaType::String) => SchemaKind::String,
            Some(SchemaType::Integer) => SchemaKind::Integer,
            Some(SchemaType::Number) => SchemaKind::Number,
            Some(SchemaType::Boolean) => SchemaKind::Boolean,
            Some(SchemaType::Array) => SchemaKind::Array(self.items.as_deref()),
            Some(SchemaType::Object) => SchemaKind::Object,
            Some(SchemaType::Null) => SchemaKind::Unknown,
            None if !self.properties.is_empty() || self.additional_properties.is_some() => {
                SchemaKind::Object
            }
            None if self.items.is_some() => SchemaKind::Array(self.items.as_deref()),
            None => SchemaKind::Unknown,
        }
    }

    /// True for plain string/integer/number/boolean nodes (enums included).
    pub fn is_scalar(&self) -> bool {
        self.reference.is_none()
            && !self.is_composition()
            && matches!(
                self.schema_type,
                Some(
                    SchemaType::String
                        | SchemaType::Integer
                        | SchemaType::Number
                        | SchemaType::Boolean
                )
            )
    }

    pub fn is_composition(&self) -> bool {
        !self.one_of.is_empty() || !self.any_of.is_empty() || !self.all_of.is_empty()
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }

    pub fn go_type_override(&self) -> Option<&str> {
        self.extensions.as_ref()?.go_type.as_deref()
    }

    // Construction helpers, mostly for hand-built graphs in tests.

    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn reference_to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    pub fn string_enum<S: AsRef<str>>(values: &[S]) -> Self {
        Self {
            schema_type: Some(SchemaType::String),
            enum_values: values
                .iter()
                .map(|v| serde_json::Value::String(v.as_ref().to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn one_of(members: Vec<SchemaNode>) -> Self {
        Self {
            one_of: members,
            ..Self::default()
        }
    }

    pub fn any_of(members: Vec<SchemaNode>) -> Self {
        Self {
            any_of: members,
            ..Self::default()
        }
    }

    pub fn all_of(members: Vec<SchemaNode>) -> Self {
        Self {
            all_of: members,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        if self.schema_type.is_none() && self.reference.is_none() && !self.is_composition() {
            self.schema_type = Some(SchemaType::Object);
        }
        self.properties.insert(name.into(), node);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn with_additional_properties(mut self, node: SchemaNode) -> Self {
        if self.schema_type.is_none() {
            self.schema_type = Some(SchemaType::Object);
        }
        self.additional_properties = Some(Box::new(node));
        self
    }

    pub fn with_discriminator(mut self, discriminator: Discriminator) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}
