use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace, warn};
use serde_json::Value;

use crate::config::{NullableStrategy, TypesConfig};
use crate::ir::{
    AliasDecl, Declaration, DeclarationBody, EnumDecl, EnumMember, FieldDecl, GoImport, GoType,
    ObjectDecl, UnionDecl, UnionKind, UnionVariant,
};
use crate::model::{Discriminator, SchemaKind, SchemaLookup, SchemaNode, SchemaType, ref_name};

use super::enum_registry::{EnumRegistry, canonical_key};
use super::name_normalizer::IdentifierNormalizer;

const NULLABLE_IMPORT: &str = "github.com/oapi-codegen/nullable";

/// Everything one resolver session produced.
#[derive(Debug, Clone, Default)]
pub struct SessionOutput {
    pub declarations: Vec<Declaration>,
    pub imports: BTreeSet<GoImport>,
}

/// A property resolved to its base type, waiting for the owner's required
/// set before it becomes a [`FieldDecl`].
pub(super) struct PendingField<'n> {
    pub(super) json_name: &'n str,
    pub(super) node: &'n SchemaNode,
    pub(super) base_type: GoType,
}

/// Walks schema nodes for one generation target and turns them into Go type
/// references, appending a declaration for every synthesized name.
///
/// A session memoizes the names it has emitted, so resolving the same node
/// twice yields the same reference and a single declaration. Enum names come
/// from the shared [`EnumRegistry`] when one is attached.
pub struct TypeResolver<'a> {
    session: String,
    pub(super) config: &'a TypesConfig,
    pub(super) normalizer: &'a IdentifierNormalizer,
    registry: Option<&'a EnumRegistry>,
    pub(super) lookup: Option<&'a dyn SchemaLookup>,
    import_mapping: Option<&'a IndexMap<String, String>>,
    yaml_tags: bool,
    pub(super) seen: HashSet<String>,
    local_enums: HashMap<String, String>,
    pub(super) declarations: Vec<Declaration>,
    imports: BTreeSet<GoImport>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        session: impl Into<String>,
        config: &'a TypesConfig,
        normalizer: &'a IdentifierNormalizer,
    ) -> Self {
        let session = session.into();
        debug!("starting resolver session {session}");
        Self {
            session,
            config,
            normalizer,
            registry: None,
            lookup: None,
            import_mapping: None,
            yaml_tags: false,
            seen: HashSet::new(),
            local_enums: HashMap::new(),
            declarations: Vec::new(),
            imports: BTreeSet::new(),
        }
    }

    pub fn with_registry(mut self, registry: &'a EnumRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_lookup(mut self, lookup: &'a dyn SchemaLookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_import_mapping(mut self, mapping: &'a IndexMap<String, String>) -> Self {
        self.import_mapping = Some(mapping);
        self
    }

    pub fn with_yaml_tags(mut self, enabled: bool) -> Self {
        self.yaml_tags = enabled;
        self
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn imports(&self) -> &BTreeSet<GoImport> {
        &self.imports
    }

    pub fn into_output(self) -> SessionOutput {
        debug!(
            "session {} finished: {} declarations, {} imports",
            self.session,
            self.declarations.len(),
            self.imports.len()
        );
        SessionOutput {
            declarations: self.declarations,
            imports: self.imports,
        }
    }

    /// Resolve a node that may be absent. Absent nodes become `any`.
    pub fn resolve_optional(
        &mut self,
        node: Option<&SchemaNode>,
        parent: &str,
        field: &str,
    ) -> GoType {
        match node {
            Some(node) => self.resolve(node, parent, field),
            None => {
                debug!("no schema for {parent}.{field}, using any");
                GoType::Any
            }
        }
    }

    /// Resolve `node`, found as `field` of `parent`, to a type reference.
    pub fn resolve(&mut self, node: &SchemaNode, parent: &str, field: &str) -> GoType {
        if let Some(go_type) = node.go_type_override() {
            if let Some(import) = node
                .extensions
                .as_ref()
                .and_then(|ext| ext.go_type_import.as_ref())
            {
                self.imports.insert(GoImport {
                    path: import.path.clone(),
                    alias: import.alias.clone(),
                });
            }
            return GoType::Custom(go_type.to_string());
        }

        match node.kind() {
            SchemaKind::Reference(reference) => self.resolve_reference(reference),
            SchemaKind::OneOf(members) => {
                self.resolve_union(node, members, UnionKind::OneOf, parent, field)
            }
            SchemaKind::AnyOf(members) => {
                self.resolve_union(node, members, UnionKind::AnyOf, parent, field)
            }
            SchemaKind::AllOf(members) => self.resolve_all_of(node, members, parent, field),
            SchemaKind::Enum(values) => self.resolve_enum(node, values, parent, field),
            SchemaKind::String => self.string_type(node.format.as_deref()),
            SchemaKind::Integer => integer_type(node.format.as_deref()),
            SchemaKind::Number => number_type(node.format.as_deref()),
            SchemaKind::Boolean => GoType::Builtin("bool"),
            SchemaKind::Array(items) => {
                let item_field = format!("{field}Item");
                GoType::slice(self.resolve_optional(items, parent, &item_field))
            }
            SchemaKind::Object => self.resolve_object(node, parent, field),
            SchemaKind::Unknown => GoType::Any,
        }
    }

    /// Emit the declaration for a named component schema.
    ///
    /// Objects, enums and compositions are declared under the schema's own
    /// name; anything else becomes an alias.
    pub fn declare_schema(&mut self, schema_name: &str, node: &SchemaNode) -> GoType {
        let name = self.normalizer.identifier(schema_name);

        if node.go_type_override().is_none() {
            match node.kind() {
                SchemaKind::OneOf(_) | SchemaKind::AnyOf(_) | SchemaKind::AllOf(_) => {
                    return self.resolve(node, "", schema_name);
                }
                SchemaKind::Object
                    if !node.properties.is_empty() && node.additional_properties.is_none() =>
                {
                    return self.resolve(node, "", schema_name);
                }
                SchemaKind::Enum(values) => {
                    if self.seen.insert(name.clone()) {
                        let base = self.enum_base_type(node);
                        self.emit_enum(&name, node, values, base);
                    }
                    return GoType::Named(name);
                }
                _ => {}
            }
        }

        if !self.seen.insert(name.clone()) {
            trace!("alias {name} already declared");
            return GoType::Named(name);
        }
        let target = self.resolve(node, &name, "");
        self.emit(Declaration::new(
            name.clone(),
            DeclarationBody::Alias(AliasDecl { target }),
        )
        .with_docs(node.description.clone(), node.deprecated));
        GoType::Named(name)
    }

    fn resolve_reference(&mut self, reference: &str) -> GoType {
        let Some(schema_name) = ref_name(reference) else {
            warn!("unparseable reference {reference:?}, using any");
            return GoType::Any;
        };
        let name = self.normalizer.identifier(schema_name);

        if let Some(module) = self.import_mapping.and_then(|m| m.get(reference)) {
            let package = module.rsplit('/').next().unwrap_or(module).to_string();
            self.imports.insert(GoImport::new(module.clone()));
            return GoType::Qualified { package, name };
        }

        if let Some(lookup) = self.lookup
            && lookup.lookup(reference).is_none()
        {
            debug!("reference {reference} is not in the schema arena");
        }
        GoType::Named(name)
    }

    fn string_type(&mut self, format: Option<&str>) -> GoType {
        match format {
            Some("date-time" | "date") => {
                self.imports.insert(GoImport::new("time"));
                GoType::Builtin("time.Time")
            }
            Some("uuid") => {
                let uuid = self.config.uuid_package;
                if let Some(path) = uuid.import_path() {
                    self.imports.insert(GoImport::new(path));
                }
                GoType::Builtin(uuid.go_type())
            }
            Some("byte" | "binary") => GoType::slice(GoType::Builtin("byte")),
            _ => GoType::Builtin("string"),
        }
    }

    fn resolve_object(&mut self, node: &SchemaNode, parent: &str, field: &str) -> GoType {
        if let Some(value) = node.additional_properties.as_deref() {
            let value_field = format!("{field}Value");
            return GoType::map(self.resolve(value, parent, &value_field));
        }
        if node.properties.is_empty() {
            return GoType::map(GoType::Any);
        }

        let name = self.synthesize_name(parent, field);
        if !self.seen.insert(name.clone()) {
            trace!("object {name} already resolved");
            return GoType::Named(name);
        }

        let pending = self.resolve_properties(&name, node.properties.iter());
        let required: Vec<&str> = node.required.iter().map(String::as_str).collect();
        let fields = self.finalize_fields(pending, &required);
        self.emit(
            Declaration::new(
                name.clone(),
                DeclarationBody::Object(ObjectDecl {
                    fields,
                    additional_properties: None,
                }),
            )
            .with_docs(node.description.clone(), node.deprecated),
        );
        GoType::Named(name)
    }

    fn resolve_enum(
        &mut self,
        node: &SchemaNode,
        values: &[Value],
        parent: &str,
        field: &str,
    ) -> GoType {
        let base = self.enum_base_type(node);
        if parent.is_empty() {
            return base;
        }
        let key = canonical_key(values);
        if key.is_empty() {
            return base;
        }

        let name = match self.registry {
            Some(registry) => match registry.canonical_name(values) {
                Some(name) => {
                    let name = name.to_string();
                    if let Some(session) = registry.generated_by(&name) {
                        trace!("enum {name} already emitted by {session}");
                        return GoType::Named(name);
                    }
                    name
                }
                None => {
                    if let Some(name) = self.local_enums.get(&key) {
                        return GoType::Named(name.clone());
                    }
                    let candidate = self.synthesize_name(parent, field);
                    let name = if registry.is_taken(&candidate) {
                        let mut n = 2;
                        while registry.is_taken(&format!("{candidate}{n}")) {
                            n += 1;
                        }
                        format!("{candidate}{n}")
                    } else {
                        candidate
                    };
                    self.local_enums.insert(key.clone(), name.clone());
                    if let Some(session) = registry.generated_by(&name) {
                        trace!("enum {name} already emitted by {session}");
                        return GoType::Named(name);
                    }
                    debug!("enum [{key}] missed the registry, naming it {name}");
                    name
                }
            },
            None => match self.local_enums.get(&key) {
                Some(name) => return GoType::Named(name.clone()),
                None => {
                    let name = self.synthesize_name(parent, field);
                    self.local_enums.insert(key, name.clone());
                    name
                }
            },
        };

        if !self.seen.insert(name.clone()) {
            return GoType::Named(name);
        }
        self.emit_enum(&name, node, values, base);
        if let Some(registry) = self.registry {
            registry.mark_generated(&name, &self.session);
        }
        GoType::Named(name)
    }

    fn emit_enum(&mut self, name: &str, node: &SchemaNode, values: &[Value], base_type: GoType) {
        let members = self.enum_members(name, values);
        self.emit(
            Declaration::new(
                name,
                DeclarationBody::Enum(EnumDecl { base_type, members }),
            )
            .with_docs(node.description.clone(), node.deprecated),
        );
    }

    fn enum_members(&self, type_name: &str, values: &[Value]) -> Vec<EnumMember> {
        let mut members = Vec::new();
        let mut literals = HashSet::new();
        let mut names = HashSet::new();

        for value in values {
            let (text, literal) = match value {
                Value::Null => continue,
                Value::String(s) => (s.clone(), value.to_string()),
                other => (other.to_string(), other.to_string()),
            };
            if !literals.insert(literal.clone()) {
                continue;
            }
            let suffix = self.normalizer.pascal_case(&text);
            let base = if suffix.is_empty() {
                format!("{type_name}Empty")
            } else {
                format!("{type_name}{suffix}")
            };
            let mut name = base.clone();
            let mut n = 2;
            while !names.insert(name.clone()) {
                name = format!("{base}{n}");
                n += 1;
            }
            members.push(EnumMember { name, literal });
        }
        members
    }

    fn enum_base_type(&mut self, node: &SchemaNode) -> GoType {
        match node.schema_type {
            Some(SchemaType::String) => self.string_type(node.format.as_deref()),
            Some(SchemaType::Integer) => integer_type(node.format.as_deref()),
            Some(SchemaType::Number) => number_type(node.format.as_deref()),
            Some(SchemaType::Boolean) => GoType::Builtin("bool"),
            _ => match node.enum_values.iter().find(|v| !v.is_null()) {
                Some(Value::Number(n)) if n.is_i64() || n.is_u64() => GoType::Builtin("int"),
                Some(Value::Number(_)) => GoType::Builtin("float64"),
                Some(Value::Bool(_)) => GoType::Builtin("bool"),
                _ => GoType::Builtin("string"),
            },
        }
    }

    fn resolve_union(
        &mut self,
        node: &SchemaNode,
        members: &[SchemaNode],
        composition: UnionKind,
        parent: &str,
        field: &str,
    ) -> GoType {
        let name = self.synthesize_name(parent, field);
        if !self.seen.insert(name.clone()) {
            trace!("union {name} already resolved");
            return GoType::Named(name);
        }

        let mut variants = Vec::with_capacity(members.len());
        let mut inline = 0;
        for member in members {
            let type_ref = if member.reference.is_some() {
                self.resolve(member, &name, "")
            } else {
                inline += 1;
                let variant_field = if inline == 1 {
                    "Variant".to_string()
                } else {
                    format!("Variant{inline}")
                };
                self.resolve(member, &name, &variant_field)
            };
            let discriminator_value = node.discriminator.as_ref().and_then(|d| {
                self.discriminator_value(d, member.reference.as_deref(), &type_ref)
            });
            variants.push(UnionVariant {
                type_ref,
                discriminator_value,
            });
        }

        self.emit(
            Declaration::new(
                name.clone(),
                DeclarationBody::Union(UnionDecl {
                    composition,
                    discriminator_property: node
                        .discriminator
                        .as_ref()
                        .map(|d| d.property_name.clone()),
                    variants,
                }),
            )
            .with_docs(node.description.clone(), node.deprecated),
        );
        GoType::Named(name)
    }

    /// The mapping literal selecting this variant: an exact reference match
    /// first, then a match on the resolved type name.
    fn discriminator_value(
        &self,
        discriminator: &Discriminator,
        reference: Option<&str>,
        type_ref: &GoType,
    ) -> Option<String> {
        if let Some(reference) = reference
            && let Some((literal, _)) = discriminator
                .mapping
                .iter()
                .find(|(_, target)| target.as_str() == reference)
        {
            return Some(literal.clone());
        }

        let resolved = match type_ref {
            GoType::Named(name) | GoType::Qualified { name, .. } => name.as_str(),
            _ => return None,
        };
        discriminator
            .mapping
            .iter()
            .find(|(_, target)| {
                ref_name(target).is_some_and(|n| self.normalizer.identifier(n) == resolved)
            })
            .map(|(literal, _)| literal.clone())
    }

    /// Resolve each property under `owner`, keeping declaration order.
    pub(super) fn resolve_properties<'n, I>(&mut self, owner: &str, properties: I) -> Vec<PendingField<'n>>
    where
        I: IntoIterator<Item = (&'n String, &'n SchemaNode)>,
    {
        let mut pending = Vec::new();
        for (json_name, node) in properties {
            let base_type = self.resolve(node, owner, json_name);
            pending.push(PendingField {
                json_name: json_name.as_str(),
                node,
                base_type,
            });
        }
        pending
    }

    pub(super) fn finalize_fields(
        &mut self,
        pending: Vec<PendingField<'_>>,
        required: &[&str],
    ) -> Vec<FieldDecl> {
        pending
            .into_iter()
            .map(|field| {
                let is_required = required.contains(&field.json_name);
                self.finalize_field(field, is_required)
            })
            .collect()
    }

    fn finalize_field(&mut self, field: PendingField<'_>, required: bool) -> FieldDecl {
        let node = field.node;
        let go_type = if node.nullable && self.config.nullable_strategy == NullableStrategy::Nullable
        {
            self.imports.insert(GoImport::new(NULLABLE_IMPORT));
            GoType::nullable(field.base_type.clone())
        } else if !required && (node.nullable || node.is_scalar()) {
            GoType::pointer(field.base_type.clone())
        } else {
            field.base_type.clone()
        };

        let go_name = node
            .extensions
            .as_ref()
            .and_then(|ext| ext.go_name.clone())
            .unwrap_or_else(|| self.normalizer.identifier(field.json_name));

        FieldDecl {
            name: field.json_name.to_string(),
            go_name,
            base_type: field.base_type,
            go_type,
            required,
            nullable: node.nullable,
            description: node.description.clone(),
            tags: self.struct_tags(field.json_name, node, required),
        }
    }

    fn struct_tags(&self, json_name: &str, node: &SchemaNode, required: bool) -> String {
        let ext = node.extensions.as_ref();
        let mut tags = Vec::new();

        if ext.is_some_and(|e| e.json_ignore) {
            return if self.yaml_tags {
                r#"json:"-" yaml:"-""#.to_string()
            } else {
                r#"json:"-""#.to_string()
            };
        }

        let omit_empty = ext.and_then(|e| e.omit_empty).unwrap_or(!required);
        let omit_zero = ext.and_then(|e| e.omit_zero).unwrap_or(false);
        let mut options = String::new();
        if omit_empty {
            options.push_str(",omitempty");
        }
        if omit_zero {
            options.push_str(",omitzero");
        }
        tags.push(format!(r#"json:"{json_name}{options}""#));
        if self.yaml_tags {
            let yaml_options = if omit_empty { ",omitempty" } else { "" };
            tags.push(format!(r#"yaml:"{json_name}{yaml_options}""#));
        }

        if let Some(ext) = ext {
            for (key, value) in &ext.extra_tags {
                tags.push(format!(r#"{key}:"{value}""#));
            }
        }
        tags.join(" ")
    }

    /// `parent + PascalCase(field)`, made into a valid identifier.
    pub(super) fn synthesize_name(&self, parent: &str, field: &str) -> String {
        synthesize_name(self.normalizer, parent, field)
    }

    pub(super) fn emit(&mut self, declaration: Declaration) {
        debug!(
            "[{}] emit {} {}",
            self.session,
            declaration.kind(),
            declaration.name
        );
        self.declarations.push(declaration);
    }
}

/// The declaration name for `field` found under `parent`. The pre-scan uses
/// it too, so both walks agree on every synthesized name.
pub(crate) fn synthesize_name(
    normalizer: &IdentifierNormalizer,
    parent: &str,
    field: &str,
) -> String {
    let name = format!("{parent}{}", normalizer.pascal_case(field));
    match name.chars().next() {
        None => "X".to_string(),
        Some(c) if c.is_ascii_digit() => format!("X{name}"),
        Some(_) => name,
    }
}

fn integer_type(format: Option<&str>) -> GoType {
    match format {
        Some("int32") => GoType::Builtin("int32"),
        Some("int64") => GoType::Builtin("int64"),
        _ => GoType::Builtin("int"),
    }
}

fn number_type(format: Option<&str>) -> GoType {
    match format {
        Some("float") => GoType::Builtin("float32"),
        _ => GoType::Builtin("float64"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UuidPackage;
    use crate::model::{SchemaExtensions, TypeImport};

    fn string() -> SchemaNode {
        SchemaNode::of_type(SchemaType::String)
    }

    #[test]
    fn test_primitive_formats() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);

        let cases = [
            (string().with_format("date-time"), "time.Time"),
            (string().with_format("date"), "time.Time"),
            (string().with_format("uuid"), "string"),
            (string().with_format("byte"), "[]byte"),
            (string().with_format("binary"), "[]byte"),
            (string().with_format("email"), "string"),
            (SchemaNode::of_type(SchemaType::Integer).with_format("int32"), "int32"),
            (SchemaNode::of_type(SchemaType::Integer).with_format("int64"), "int64"),
            (SchemaNode::of_type(SchemaType::Integer), "int"),
            (SchemaNode::of_type(SchemaType::Number).with_format("float"), "float32"),
            (SchemaNode::of_type(SchemaType::Number).with_format("double"), "float64"),
            (SchemaNode::of_type(SchemaType::Boolean), "bool"),
            (SchemaNode::of_type(SchemaType::Null), "any"),
            (SchemaNode::default(), "any"),
        ];
        for (node, expected) in cases {
            assert_eq!(r.resolve(&node, "Pet", "x").to_string(), expected);
        }
        assert!(r.declarations().is_empty());
        assert_eq!(
            r.imports().iter().map(|i| i.path.as_str()).collect::<Vec<_>>(),
            vec!["time"]
        );
    }

    #[test]
    fn test_uuid_package_records_import() {
        let config = TypesConfig {
            uuid_package: UuidPackage::Google,
            ..TypesConfig::default()
        };
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);
        let ty = r.resolve(&string().with_format("uuid"), "Pet", "id");
        assert_eq!(ty.to_string(), "uuid.UUID");
        assert!(r.imports().contains(&GoImport::new("github.com/google/uuid")));
    }

    #[test]
    fn test_go_type_override() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);
        let mut node = string();
        node.extensions = Some(SchemaExtensions {
            go_type: Some("decimal.Decimal".to_string()),
            go_type_import: Some(TypeImport {
                path: "github.com/shopspring/decimal".to_string(),
                alias: None,
            }),
            ..SchemaExtensions::default()
        });
        assert_eq!(r.resolve(&node, "Order", "total").to_string(), "decimal.Decimal");
        assert!(
            r.imports()
                .contains(&GoImport::new("github.com/shopspring/decimal"))
        );
        assert!(r.declarations().is_empty());
    }

    #[test]
    fn test_reference_and_import_mapping() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mapping = IndexMap::from([(
            "#/components/schemas/Money".to_string(),
            "github.com/acme/money".to_string(),
        )]);
        let mut r = TypeResolver::new("types", &config, &n).with_import_mapping(&mapping);

        let pet = r.resolve(&SchemaNode::reference_to("#/components/schemas/pet_owner"), "", "");
        assert_eq!(pet, GoType::Named("PetOwner".to_string()));

        let money = r.resolve(&SchemaNode::reference_to("#/components/schemas/Money"), "", "");
        assert_eq!(money.to_string(), "money.Money");
        assert!(r.imports().contains(&GoImport::new("github.com/acme/money")));

        assert_eq!(r.resolve(&SchemaNode::reference_to(""), "", ""), GoType::Any);
        assert!(r.declarations().is_empty());
    }

    #[test]
    fn test_nested_object_and_array_naming() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);

        let user = SchemaNode::of_type(SchemaType::Object)
            .with_property(
                "preferences",
                SchemaNode::default().with_property("theme", string()),
            )
            .with_property(
                "tags",
                SchemaNode::array(SchemaNode::default().with_property("label", string())),
            )
            .with_required("preferences");
        let ty = r.resolve(&user, "", "User");

        assert_eq!(ty.to_string(), "User");
        let names: Vec<&str> = r.declarations().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["UserPreferences", "UserTagsItem", "User"]);

        let decl = &r.declarations()[2];
        let tags = decl.field("tags").unwrap();
        assert_eq!(tags.go_type.to_string(), "[]UserTagsItem");
        assert_eq!(tags.tags, r#"json:"tags,omitempty""#);
        let prefs = decl.field("preferences").unwrap();
        assert_eq!(prefs.go_type.to_string(), "UserPreferences");
        assert_eq!(prefs.tags, r#"json:"preferences""#);
    }

    #[test]
    fn test_maps() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);

        let free_form = SchemaNode::of_type(SchemaType::Object);
        assert_eq!(r.resolve(&free_form, "Pet", "meta").to_string(), "map[string]any");

        let typed = SchemaNode::of_type(SchemaType::Object)
            .with_property("ignored", string())
            .with_additional_properties(SchemaNode::default().with_property("count", string()));
        assert_eq!(
            r.resolve(&typed, "Pet", "labels").to_string(),
            "map[string]PetLabelsValue"
        );
        assert_eq!(r.declarations().len(), 1);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);
        let node = SchemaNode::default().with_property("city", string());

        let first = r.resolve(&node, "User", "address");
        let second = r.resolve(&node, "User", "address");
        assert_eq!(first, second);
        assert_eq!(r.declarations().len(), 1);
    }

    #[test]
    fn test_field_wrapping() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);
        let node = SchemaNode::default()
            .with_property("name", string())
            .with_property("nick", string())
            .with_property("bio", string().nullable())
            .with_property("owner", SchemaNode::reference_to("#/components/schemas/User"))
            .with_required("name")
            .with_required("bio");
        r.resolve(&node, "", "Pet");

        let decl = &r.declarations()[0];
        let types: Vec<String> = decl.fields().iter().map(|f| f.go_type.to_string()).collect();
        assert_eq!(types, vec!["string", "*string", "string", "User"]);
    }

    #[test]
    fn test_nullable_strategy_wraps_field() {
        let config = TypesConfig {
            nullable_strategy: NullableStrategy::Nullable,
            ..TypesConfig::default()
        };
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);
        let node = SchemaNode::default().with_property("bio", string().nullable());
        r.resolve(&node, "", "Pet");

        let field = r.declarations()[0].field("bio").unwrap();
        assert_eq!(field.go_type.to_string(), "nullable.Nullable[string]");
        assert_eq!(field.base_type.to_string(), "string");
        assert!(r.imports().contains(&GoImport::new(NULLABLE_IMPORT)));
    }

    #[test]
    fn test_struct_tag_extensions() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n).with_yaml_tags(true);

        let mut count = SchemaNode::of_type(SchemaType::Integer);
        count.extensions = Some(SchemaExtensions {
            go_name: Some("Total".to_string()),
            omit_empty: Some(false),
            omit_zero: Some(true),
            extra_tags: IndexMap::from([("validate".to_string(), "min=0".to_string())]),
            ..SchemaExtensions::default()
        });
        let mut secret = string();
        secret.extensions = Some(SchemaExtensions {
            json_ignore: true,
            ..SchemaExtensions::default()
        });
        let node = SchemaNode::default()
            .with_property("count", count)
            .with_property("secret", secret);
        r.resolve(&node, "", "Stats");

        let decl = &r.declarations()[0];
        let count = decl.field("count").unwrap();
        assert_eq!(count.go_name, "Total");
        assert_eq!(
            count.tags,
            r#"json:"count,omitzero" yaml:"count" validate:"min=0""#
        );
        assert_eq!(decl.field("secret").unwrap().tags, r#"json:"-" yaml:"-""#);
    }

    #[test]
    fn test_local_enum_memoization() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);
        let status = SchemaNode::string_enum(&["active", "inactive"]);

        assert_eq!(r.resolve(&status, "Pet", "status").to_string(), "PetStatus");
        assert_eq!(r.resolve(&status, "Order", "state").to_string(), "PetStatus");
        // Parentless enums stay primitive.
        assert_eq!(r.resolve(&status, "", "status").to_string(), "string");
        assert_eq!(r.declarations().len(), 1);

        let DeclarationBody::Enum(decl) = &r.declarations()[0].body else {
            panic!("expected enum");
        };
        let members: Vec<(&str, &str)> = decl
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.literal.as_str()))
            .collect();
        assert_eq!(
            members,
            vec![
                ("PetStatusActive", r#""active""#),
                ("PetStatusInactive", r#""inactive""#)
            ]
        );
    }

    #[test]
    fn test_integer_enum_members() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);
        let mut level = SchemaNode::of_type(SchemaType::Integer);
        level.enum_values = vec![serde_json::json!(1), serde_json::json!(2)];
        r.resolve(&level, "Alert", "level");

        let DeclarationBody::Enum(decl) = &r.declarations()[0].body else {
            panic!("expected enum");
        };
        assert_eq!(decl.base_type.to_string(), "int");
        assert_eq!(decl.members[0].name, "AlertLevel1");
        assert_eq!(decl.members[1].literal, "2");
    }

    #[test]
    fn test_union_variants_and_discriminator() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);

        let node = SchemaNode::one_of(vec![
            SchemaNode::reference_to("#/components/schemas/Cat"),
            SchemaNode::reference_to("#/components/schemas/Dog"),
            SchemaNode::default().with_property("wings", SchemaNode::of_type(SchemaType::Integer)),
            string(),
        ])
        .with_discriminator(Discriminator {
            property_name: "petType".to_string(),
            mapping: IndexMap::from([
                ("cat".to_string(), "#/components/schemas/Cat".to_string()),
                ("dog".to_string(), "Dog".to_string()),
            ]),
        });
        assert_eq!(r.resolve(&node, "Owner", "pet").to_string(), "OwnerPet");

        let decl = r.declarations().last().unwrap();
        let DeclarationBody::Union(union) = &decl.body else {
            panic!("expected union");
        };
        assert_eq!(union.composition, UnionKind::OneOf);
        assert_eq!(union.discriminator_property.as_deref(), Some("petType"));
        let variants: Vec<(String, Option<&str>)> = union
            .variants
            .iter()
            .map(|v| (v.type_ref.to_string(), v.discriminator_value.as_deref()))
            .collect();
        assert_eq!(
            variants,
            vec![
                ("Cat".to_string(), Some("cat")),
                ("Dog".to_string(), Some("dog")),
                ("OwnerPetVariant".to_string(), None),
                ("string".to_string(), None),
            ]
        );
        assert_eq!(r.declarations()[0].name, "OwnerPetVariant");
    }

    #[test]
    fn test_declare_schema_aliases() {
        let config = TypesConfig::default();
        let n = IdentifierNormalizer::new();
        let mut r = TypeResolver::new("types", &config, &n);

        r.declare_schema("pet_id", &SchemaNode::of_type(SchemaType::Integer).with_format("int64"));
        r.declare_schema(
            "PetList",
            &SchemaNode::array(SchemaNode::reference_to("#/components/schemas/Pet")),
        );
        r.declare_schema("Color", &SchemaNode::string_enum(&["red", "green"]));
        r.declare_schema("Pet", &SchemaNode::default().with_property("name", string()));

        let summary: Vec<String> = r
            .declarations()
            .iter()
            .map(|d| format!("{}:{}", d.kind(), d.name))
            .collect();
        assert_eq!(
            summary,
            vec!["alias:PetID", "alias:PetList", "enum:Color", "object:Pet"]
        );
        let DeclarationBody::Alias(alias) = &r.declarations()[1].body else {
            panic!("expected alias");
        };
        assert_eq!(alias.target.to_string(), "[]Pet");
    }
}
