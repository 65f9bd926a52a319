use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::config::AllOfStrategy;
use crate::ir::{AllOfDecl, Declaration, DeclarationBody, GoType, ObjectDecl};
use crate::model::{SchemaLookup, SchemaNode};

use super::type_resolver::TypeResolver;

/// Properties and required names gathered from an allOf expansion.
/// The first declaration of a property name wins.
#[derive(Default)]
struct MergedProperties<'n> {
    properties: IndexMap<&'n String, &'n SchemaNode>,
    required: Vec<&'n str>,
}

impl<'n> MergedProperties<'n> {
    fn absorb(&mut self, node: &'n SchemaNode) {
        for (name, child) in &node.properties {
            self.properties.entry(name).or_insert(child);
        }
        for name in &node.required {
            if !self.required.contains(&name.as_str()) {
                self.required.push(name);
            }
        }
    }
}

impl TypeResolver<'_> {
    pub(super) fn resolve_all_of(
        &mut self,
        node: &SchemaNode,
        members: &[SchemaNode],
        parent: &str,
        field: &str,
    ) -> GoType {
        let name = self.synthesize_name(parent, field);
        if !self.seen.insert(name.clone()) {
            trace!("allOf {name} already resolved");
            return GoType::Named(name);
        }

        let body = match (self.config.all_of_strategy, self.lookup) {
            (AllOfStrategy::Flatten, Some(lookup)) => self.flatten_all_of(&name, node, lookup),
            (AllOfStrategy::Flatten, None) => {
                debug!("allOf {name}: no schema lookup, embedding instead of flattening");
                self.embed_all_of(&name, node, members)
            }
            (AllOfStrategy::Embed, _) => self.embed_all_of(&name, node, members),
        };

        self.emit(
            Declaration::new(name.clone(), body)
                .with_docs(node.description.clone(), node.deprecated),
        );
        GoType::Named(name)
    }

    /// Referenced members stay embedded; inline members and the node's own
    /// properties are merged into fields.
    fn embed_all_of(
        &mut self,
        name: &str,
        node: &SchemaNode,
        members: &[SchemaNode],
    ) -> DeclarationBody {
        let mut embeds = Vec::new();
        let mut merged = MergedProperties::default();

        for member in members {
            if member.reference.is_some() {
                embeds.push(self.resolve(member, name, ""));
            } else {
                merged.absorb(member);
            }
        }
        merged.absorb(node);

        let pending = self.resolve_properties(name, merged.properties);
        let fields = self.finalize_fields(pending, &merged.required);

        if embeds.is_empty() {
            DeclarationBody::Object(ObjectDecl {
                fields,
                additional_properties: None,
            })
        } else {
            DeclarationBody::AllOf(AllOfDecl { embeds, fields })
        }
    }

    /// Every member, references included, spliced into one struct.
    fn flatten_all_of(
        &mut self,
        name: &str,
        node: &SchemaNode,
        lookup: &dyn SchemaLookup,
    ) -> DeclarationBody {
        let mut merged = MergedProperties::default();
        let mut visiting = Vec::new();
        flatten_schema(lookup, node, &mut visiting, &mut merged);

        let pending = self.resolve_properties(name, merged.properties);
        let fields = self.finalize_fields(pending, &merged.required);
        DeclarationBody::Object(ObjectDecl {
            fields,
            additional_properties: None,
        })
    }
}

/// Expand `node` into `merged`: follow references, then nested allOf
/// members, then the node's own properties.
fn flatten_schema<'n>(
    lookup: &'n dyn SchemaLookup,
    node: &'n SchemaNode,
    visiting: &mut Vec<&'n str>,
    merged: &mut MergedProperties<'n>,
) {
    if let Some(reference) = node.reference.as_deref() {
        if visiting.contains(&reference) {
            debug!("allOf cycle through {reference}, skipping");
            return;
        }
        let Some(target) = lookup.lookup(reference) else {
            warn!("allOf member {reference} not found, skipping");
            return;
        };
        visiting.push(reference);
        flatten_schema(lookup, target, visiting, merged);
        visiting.pop();
        return;
    }

    for member in &node.all_of {
        flatten_schema(lookup, member, visiting, merged);
    }
    merged.absorb(node);
}
