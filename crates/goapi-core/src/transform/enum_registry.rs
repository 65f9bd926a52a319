use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, trace};
use serde_json::Value;

use super::name_normalizer::IdentifierNormalizer;

/// One place an enumeration was seen during the pre-scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumUsage {
    pub field_name: String,
    pub parent_name: String,
    /// Stringified literals, sorted and de-duplicated.
    pub values: Vec<String>,
    pub canonical_key: String,
}

/// Stringify enum literals: strings verbatim, numbers and booleans through
/// their JSON text, nulls dropped. Sorted and de-duplicated.
pub fn canonical_values(values: &[Value]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .filter_map(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

/// The key two enums share exactly when they carry the same literal set.
pub fn canonical_key(values: &[Value]) -> String {
    canonical_values(values).join("|")
}

/// Collects enum usages before any naming decision is made.
///
/// Consumed by [`resolve_names`](Self::resolve_names), so names can only be
/// looked up once every usage has been seen.
#[derive(Debug, Default)]
pub struct EnumUsageCollector {
    usages: Vec<EnumUsage>,
    reserved: HashSet<String>,
}

impl EnumUsageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect_usage(&mut self, field_name: &str, parent_name: &str, values: &[Value]) {
        let values = canonical_values(values);
        if values.is_empty() {
            return;
        }
        trace!("enum usage {parent_name}.{field_name}: {values:?}");
        self.usages.push(EnumUsage {
            field_name: field_name.to_string(),
            parent_name: parent_name.to_string(),
            canonical_key: values.join("|"),
            values,
        });
    }

    /// Names enum declarations must never take.
    pub fn reserve_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
    }

    pub fn usages(&self) -> &[EnumUsage] {
        &self.usages
    }

    /// Bind one name per distinct literal set and freeze the result.
    ///
    /// Keys are processed in sorted order. The most frequent field name
    /// (ties broken by the smallest name) becomes the base; a base that is
    /// reserved or bound to another key gets the two smallest literals
    /// appended, then an integer counter if that is still taken.
    pub fn resolve_names(self, normalizer: &IdentifierNormalizer) -> EnumRegistry {
        let mut groups: BTreeMap<&str, Vec<&EnumUsage>> = BTreeMap::new();
        for usage in &self.usages {
            groups.entry(&usage.canonical_key).or_default().push(usage);
        }

        let mut key_to_name: HashMap<String, String> = HashMap::new();
        let mut name_to_key: HashMap<String, String> = HashMap::new();

        for (key, usages) in groups {
            let base = base_name(&usages, normalizer);
            let taken = |name: &str| {
                self.reserved.contains(name) || name_to_key.get(name).is_some_and(|k| k != key)
            };

            let name = if !taken(&base) {
                base
            } else {
                let suffix: String = usages[0]
                    .values
                    .iter()
                    .take(2)
                    .map(|v| normalizer.pascal_case(v))
                    .collect();
                let suffixed = format!("{base}{suffix}");
                if !taken(&suffixed) {
                    suffixed
                } else {
                    let mut n = 2;
                    while taken(&format!("{suffixed}{n}")) {
                        n += 1;
                    }
                    format!("{suffixed}{n}")
                }
            };

            debug!("enum [{key}] -> {name}");
            name_to_key.insert(name.clone(), key.to_string());
            key_to_name.insert(key.to_string(), name);
        }

        EnumRegistry {
            key_to_name,
            name_to_key,
            reserved: self.reserved,
            generated: RefCell::new(HashMap::new()),
        }
    }
}

fn base_name(usages: &[&EnumUsage], normalizer: &IdentifierNormalizer) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for usage in usages {
        *counts.entry(&usage.field_name).or_default() += 1;
    }
    let field = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name)
        .unwrap_or_default();

    if field.is_empty() {
        "Enum".to_string()
    } else {
        normalizer.identifier(field)
    }
}

/// Frozen enum names shared by every generation session of one run.
///
/// Bindings never change after construction; only the record of which
/// session emitted each declaration is written, through `&self`.
#[derive(Debug)]
pub struct EnumRegistry {
    key_to_name: HashMap<String, String>,
    name_to_key: HashMap<String, String>,
    reserved: HashSet<String>,
    generated: RefCell<HashMap<String, String>>,
}

impl EnumRegistry {
    /// The name bound to this literal set, if it was seen during the pre-scan.
    pub fn canonical_name(&self, values: &[Value]) -> Option<&str> {
        self.name_for_key(&canonical_key(values))
    }

    pub fn name_for_key(&self, key: &str) -> Option<&str> {
        self.key_to_name.get(key).map(String::as_str)
    }

    /// Whether `name` is reserved or bound to an enum.
    pub fn is_taken(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.name_to_key.contains_key(name)
    }

    pub fn mark_generated(&self, name: &str, session: &str) {
        self.generated
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| session.to_string());
    }

    pub fn is_generated(&self, name: &str) -> bool {
        self.generated.borrow().contains_key(name)
    }

    /// The session that first emitted `name`.
    pub fn generated_by(&self, name: &str) -> Option<String> {
        self.generated.borrow().get(name).cloned()
    }

    /// All bindings as `(name, canonical key)`, sorted by name.
    pub fn bindings(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .name_to_key
            .iter()
            .map(|(name, key)| (name.as_str(), key.as_str()))
            .collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.key_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_to_name.is_empty()
    }
}
