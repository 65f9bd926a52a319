pub mod operations;
pub mod schema;
pub mod spec;

pub use operations::*;
pub use schema::*;
pub use spec::{Info, SchemaLookup, Spec, ref_name};

use crate::error::LoadError;

/// Load a canonical specification document from YAML.
pub fn from_yaml(input: &str) -> Result<Spec, LoadError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Load a canonical specification document from JSON.
pub fn from_json(input: &str) -> Result<Spec, LoadError> {
    Ok(serde_json::from_str(input)?)
}
