use log::{debug, info};
use serde::Serialize;

use crate::GeneratedFile;
use crate::config::{GoapiConfig, TargetKind};
use crate::model::{SchemaKind, SchemaNode, Spec, preferred_content};
use crate::targets::{TargetContext, TargetOutput, pass_for};
use crate::transform::type_resolver::synthesize_name;
use crate::transform::{EnumRegistry, EnumUsageCollector, IdentifierNormalizer};

/// Result of running every configured target over one spec.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    pub targets: Vec<TargetOutput>,
}

impl GenerationOutput {
    pub fn target(&self, kind: TargetKind) -> Option<&TargetOutput> {
        self.targets.iter().find(|t| t.target == kind)
    }

    /// One pretty-printed `<target>.json` file per target.
    pub fn to_files(&self) -> Result<Vec<GeneratedFile>, serde_json::Error> {
        self.targets
            .iter()
            .map(|target| {
                Ok(GeneratedFile {
                    path: format!("{}.json", target.target),
                    content: serde_json::to_string_pretty(target)?,
                })
            })
            .collect()
    }
}

/// Runs the pre-scan, freezes the enum registry, then one resolver session
/// per configured target.
pub struct Generator<'c> {
    config: &'c GoapiConfig,
    normalizer: IdentifierNormalizer,
}

impl<'c> Generator<'c> {
    pub fn new(config: &'c GoapiConfig) -> Self {
        let normalizer =
            IdentifierNormalizer::with_initialisms(&config.go.output_options.additional_initialisms);
        Self { config, normalizer }
    }

    pub fn normalizer(&self) -> &IdentifierNormalizer {
        &self.normalizer
    }

    pub fn generate(&self, spec: &Spec) -> GenerationOutput {
        let registry = self.prescan(spec);
        info!("resolved {} enum names", registry.len());

        let ctx = TargetContext {
            config: self.config,
            normalizer: &self.normalizer,
            registry: &registry,
            spec,
        };
        let targets = self
            .config
            .go
            .expanded_targets()
            .into_iter()
            .filter_map(pass_for)
            .map(|pass| {
                debug!("running target {}", pass.kind());
                pass.run(&ctx)
            })
            .collect();
        GenerationOutput { targets }
    }

    /// Collect every enum usage the target passes can reach, reserve the
    /// names templates derive from schemas and operations, and freeze.
    pub fn prescan(&self, spec: &Spec) -> EnumRegistry {
        let mut collector = EnumUsageCollector::new();

        for (name, node) in &spec.schemas {
            if !self.config.accepts_schema(name) {
                continue;
            }
            collector.reserve_names([self.normalizer.identifier(name)]);
            self.collect_schema(&mut collector, name, node);
        }

        for op in &spec.operations {
            if !self.config.accepts_tags(&op.tags) {
                continue;
            }
            let op_name = self.normalizer.identifier(&op.name_source());

            for param in &op.parameters {
                if let Some(schema) = &param.schema {
                    self.collect_node(&mut collector, &op_name, &param.name, schema);
                }
            }
            if let Some((_, media)) = op
                .request_body
                .as_ref()
                .and_then(|body| preferred_content(&body.content))
                && let Some(schema) = &media.schema
            {
                self.collect_node(&mut collector, &op_name, "Body", schema);
            }

            let mut reserved: Vec<String> = [
                "Request",
                "Response",
                "Params",
                "QueryParams",
                "MultipartRequest",
                "FormRequest",
                "RequestObject",
                "ResponseObject",
            ]
            .iter()
            .map(|suffix| format!("{op_name}{suffix}"))
            .collect();

            for (status, response) in &op.responses {
                let status_name = self.normalizer.pascal_case(status);
                reserved.push(format!("{op_name}{status_name}Response"));
                reserved.push(format!("{op_name}{status_name}JSONResponse"));
                if let Some((_, media)) = preferred_content(&response.content)
                    && let Some(schema) = &media.schema
                {
                    let field = format!("{status}ResponseBody");
                    self.collect_node(&mut collector, &op_name, &field, schema);
                }
            }
            collector.reserve_names(reserved);
        }

        debug!("pre-scan collected {} enum usages", collector.usages().len());
        collector.resolve_names(&self.normalizer)
    }

    /// Mirror of `TypeResolver::declare_schema`: compositions and objects
    /// are walked under the schema's own name, anything else as an alias
    /// whose children hang off the schema identifier.
    fn collect_schema(&self, collector: &mut EnumUsageCollector, name: &str, node: &SchemaNode) {
        if node.go_type_override().is_some() {
            return;
        }
        match node.kind() {
            SchemaKind::OneOf(_) | SchemaKind::AnyOf(_) | SchemaKind::AllOf(_) => {
                self.collect_node(collector, "", name, node);
            }
            SchemaKind::Object
                if !node.properties.is_empty() && node.additional_properties.is_none() =>
            {
                self.collect_node(collector, "", name, node);
            }
            SchemaKind::Enum(_) => {}
            _ => {
                let alias = self.normalizer.identifier(name);
                self.collect_node(collector, &alias, "", node);
            }
        }
    }

    /// Mirror of the resolver's walk: same parent/field pairs, so the
    /// registry sees every enum a session will ask about. Names the resolver
    /// synthesizes for inline composites are reserved so no enum takes them.
    fn collect_node(
        &self,
        collector: &mut EnumUsageCollector,
        parent: &str,
        field: &str,
        node: &SchemaNode,
    ) {
        if node.go_type_override().is_some() {
            return;
        }
        let owner = synthesize_name(&self.normalizer, parent, field);

        match node.kind() {
            SchemaKind::Reference(_) => {}
            SchemaKind::Enum(values) => {
                if parent.is_empty() {
                    return;
                }
                if is_structural_field(field) {
                    collector.collect_usage(&owner, parent, values);
                } else {
                    collector.collect_usage(field, parent, values);
                }
            }
            SchemaKind::OneOf(members) | SchemaKind::AnyOf(members) => {
                collector.reserve_names([owner.as_str()]);
                let inline = members.iter().filter(|m| m.reference.is_none());
                for (i, member) in inline.enumerate() {
                    let variant = match i {
                        0 => "Variant".to_string(),
                        n => format!("Variant{}", n + 1),
                    };
                    self.collect_node(collector, &owner, &variant, member);
                }
            }
            SchemaKind::AllOf(members) => {
                collector.reserve_names([owner.as_str()]);
                for member in members {
                    self.collect_properties(collector, &owner, member);
                }
                self.collect_properties(collector, &owner, node);
            }
            SchemaKind::Array(Some(items)) => {
                self.collect_node(collector, parent, &format!("{field}Item"), items);
            }
            SchemaKind::Object => match node.additional_properties.as_deref() {
                Some(value) => {
                    self.collect_node(collector, parent, &format!("{field}Value"), value);
                }
                None if node.properties.is_empty() => {}
                None => {
                    collector.reserve_names([owner.as_str()]);
                    self.collect_properties(collector, &owner, node);
                }
            },
            _ => {}
        }
    }

    fn collect_properties(&self, collector: &mut EnumUsageCollector, owner: &str, node: &SchemaNode) {
        for (name, child) in &node.properties {
            self.collect_node(collector, owner, name, child);
        }
    }
}

/// Field names the walk invents for alias items, map values and inline union
/// members. They say nothing on their own, so enums found there are named
/// after the full owner (`ColorsItem` rather than `Item`).
fn is_structural_field(field: &str) -> bool {
    match field {
        "Item" | "Value" => true,
        _ => field
            .strip_prefix("Variant")
            .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit())),
    }
}
