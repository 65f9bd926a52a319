pub mod config;
pub mod error;
pub mod generate;
pub mod ir;
pub mod model;
pub mod targets;
pub mod transform;

pub use generate::{GenerationOutput, Generator};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
