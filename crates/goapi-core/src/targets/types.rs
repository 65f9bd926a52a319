use log::debug;

use crate::config::TargetKind;

use super::{TargetContext, TargetOutput, TargetPass};

/// Declares every component schema that is not excluded.
pub struct TypesPass;

impl TargetPass for TypesPass {
    fn kind(&self) -> TargetKind {
        TargetKind::Types
    }

    fn run(&self, ctx: &TargetContext<'_>) -> TargetOutput {
        let mut resolver = ctx.resolver(self.kind());
        for (name, node) in &ctx.spec.schemas {
            if !ctx.config.accepts_schema(name) {
                debug!("skipping excluded schema {name}");
                continue;
            }
            resolver.declare_schema(name, node);
        }
        ctx.finish(self.kind(), resolver, Vec::new())
    }
}
