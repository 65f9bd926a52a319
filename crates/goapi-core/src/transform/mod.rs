pub mod composition;
pub mod enum_registry;
pub mod name_normalizer;
pub mod type_resolver;

pub use enum_registry::{EnumRegistry, EnumUsage, EnumUsageCollector};
pub use name_normalizer::{IdentifierNormalizer, escape_keyword};
pub use type_resolver::{SessionOutput, TypeResolver};
