use serde::Serialize;

use super::types::GoType;

/// A named type declaration emitted by a resolver session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(flatten)]
    pub body: DeclarationBody,
}

impl Declaration {
    pub fn new(name: impl Into<String>, body: DeclarationBody) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecated: false,
            body,
        }
    }

    pub fn with_docs(mut self, description: Option<String>, deprecated: bool) -> Self {
        self.description = description;
        self.deprecated = deprecated;
        self
    }

    pub fn kind(&self) -> &'static str {
        match &self.body {
            DeclarationBody::Object(_) => "object",
            DeclarationBody::Enum(_) => "enum",
            DeclarationBody::Union(_) => "union",
            DeclarationBody::AllOf(_) => "all_of",
            DeclarationBody::Alias(_) => "alias",
        }
    }

    /// Struct fields for object and allOf declarations; empty otherwise.
    pub fn fields(&self) -> &[FieldDecl] {
        match &self.body {
            DeclarationBody::Object(object) => &object.fields,
            DeclarationBody::AllOf(all_of) => &all_of.fields,
            _ => &[],
        }
    }

    pub fn field(&self, json_name: &str) -> Option<&FieldDecl> {
        self.fields().iter().find(|f| f.name == json_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclarationBody {
    Object(ObjectDecl),
    Enum(EnumDecl),
    Union(UnionDecl),
    AllOf(AllOfDecl),
    Alias(AliasDecl),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectDecl {
    pub fields: Vec<FieldDecl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<GoType>,
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    /// Property name as it appears on the wire.
    pub name: String,
    pub go_name: String,
    /// The resolved type before optional/nullable wrapping.
    pub base_type: GoType,
    pub go_type: GoType,
    pub required: bool,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rendered struct tag, without the surrounding backticks.
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDecl {
    pub base_type: GoType,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMember {
    /// Constant identifier, e.g. `StatusActive`.
    pub name: String,
    /// Go literal, e.g. `"active"` or `42`.
    pub literal: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionKind {
    OneOf,
    AnyOf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionDecl {
    pub composition: UnionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_property: Option<String>,
    pub variants: Vec<UnionVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionVariant {
    pub type_ref: GoType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,
}

/// allOf rendered as a struct embedding its referenced members.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AllOfDecl {
    pub embeds: Vec<GoType>,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasDecl {
    pub target: GoType,
}
