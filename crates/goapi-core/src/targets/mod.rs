pub mod operations;
pub mod types;

use serde::Serialize;

use crate::config::{EnumStrategy, GoapiConfig, TargetKind};
use crate::ir::{Declaration, GoImport};
use crate::model::Spec;
use crate::transform::{EnumRegistry, IdentifierNormalizer, TypeResolver};

pub use operations::{
    BodyType, OperationPass, OperationTypes, ParameterType, ResponseType,
};
pub use types::TypesPass;

/// Shared, read-only state every target pass of one run sees.
pub struct TargetContext<'a> {
    pub config: &'a GoapiConfig,
    pub normalizer: &'a IdentifierNormalizer,
    pub registry: &'a EnumRegistry,
    pub spec: &'a Spec,
}

impl<'a> TargetContext<'a> {
    /// A fresh resolver session for `target`, wired to the shared registry.
    pub fn resolver(&self, target: TargetKind) -> TypeResolver<'a> {
        TypeResolver::new(target.as_str(), &self.config.go.types, self.normalizer)
            .with_registry(self.registry)
            .with_lookup(self.spec)
            .with_import_mapping(&self.config.go.import_mapping)
            .with_yaml_tags(self.config.go.output_options.enable_yaml_tags)
    }

    fn finish(
        &self,
        target: TargetKind,
        resolver: TypeResolver<'_>,
        operations: Vec<OperationTypes>,
    ) -> TargetOutput {
        let session = resolver.into_output();
        TargetOutput {
            target,
            package: self.config.go.package.clone(),
            enum_strategy: self.config.go.types.enum_strategy,
            declarations: session.declarations,
            imports: session.imports.into_iter().collect(),
            operations,
        }
    }
}

/// Template-ready data for one generation target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutput {
    pub target: TargetKind,
    pub package: String,
    pub enum_strategy: EnumStrategy,
    pub declarations: Vec<Declaration>,
    pub imports: Vec<GoImport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationTypes>,
}

impl TargetOutput {
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn declaration_names(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn operation(&self, id: &str) -> Option<&OperationTypes> {
        self.operations.iter().find(|op| op.id == id)
    }
}

/// One generation target's walk over the spec.
pub trait TargetPass {
    fn kind(&self) -> TargetKind;
    fn run(&self, ctx: &TargetContext<'_>) -> TargetOutput;
}

/// The pass implementing `kind`. `All` has no pass of its own.
pub fn pass_for(kind: TargetKind) -> Option<Box<dyn TargetPass>> {
    match kind {
        TargetKind::Types => Some(Box::new(TypesPass)),
        TargetKind::Server | TargetKind::StrictServer | TargetKind::Client => {
            Some(Box::new(OperationPass::new(kind)))
        }
        TargetKind::All => None,
    }
}
