use std::fmt;

use serde::{Serialize, Serializer};

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// An import the generated file needs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GoImport {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl GoImport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }
}

impl fmt::Display for GoImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias} \"{}\"", self.path),
            None => write!(f, "\"{}\"", self.path),
        }
    }
}

/// A resolved Go type reference.
///
/// Rendered to Go source text through `Display`; serialized the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GoType {
    /// Predeclared or standard-library type: `string`, `int64`, `time.Time`.
    Builtin(&'static str),
    /// A `go-type` override, used verbatim.
    Custom(String),
    /// A declaration in the generated package.
    Named(String),
    /// A type from an imported package (`pkg.Name`).
    Qualified { package: String, name: String },
    Slice(Box<GoType>),
    /// `map[string]T`
    Map(Box<GoType>),
    Pointer(Box<GoType>),
    /// `nullable.Nullable[T]`
    Nullable(Box<GoType>),
    Any,
}

impl GoType {
    pub fn slice(inner: GoType) -> Self {
        GoType::Slice(Box::new(inner))
    }

    pub fn map(value: GoType) -> Self {
        GoType::Map(Box::new(value))
    }

    pub fn pointer(inner: GoType) -> Self {
        GoType::Pointer(Box::new(inner))
    }

    pub fn nullable(inner: GoType) -> Self {
        GoType::Nullable(Box::new(inner))
    }

    /// The name of the generated declaration this type refers to, if any.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            GoType::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, GoType::Any)
    }

    /// Go source text for this type.
    pub fn type_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Builtin(name) => f.write_str(name),
            GoType::Custom(name) | GoType::Named(name) => f.write_str(name),
            GoType::Qualified { package, name } => write!(f, "{package}.{name}"),
            GoType::Slice(inner) => write!(f, "[]{inner}"),
            GoType::Map(value) => write!(f, "map[string]{value}"),
            GoType::Pointer(inner) => write!(f, "*{inner}"),
            GoType::Nullable(inner) => write!(f, "nullable.Nullable[{inner}]"),
            GoType::Any => f.write_str("any"),
        }
    }
}

impl Serialize for GoType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
