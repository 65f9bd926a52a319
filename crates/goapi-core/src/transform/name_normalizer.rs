use std::collections::HashSet;

use heck::{ToShoutySnakeCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Initialisms that are written fully upper-case inside identifiers.
const COMMON_INITIALISMS: &[&str] = &[
    "API", "ASCII", "CPU", "CSS", "CVV", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Initialism-aware casing for Go identifiers.
///
/// The initialism table is fixed once the normalizer is built; extra entries
/// from configuration go in through [`IdentifierNormalizer::with_initialisms`].
#[derive(Debug, Clone)]
pub struct IdentifierNormalizer {
    initialisms: HashSet<String>,
}

impl Default for IdentifierNormalizer {
    fn default() -> Self {
        Self {
            initialisms: COMMON_INITIALISMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IdentifierNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default table plus `extra` (matched case-insensitively).
    pub fn with_initialisms<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalizer = Self::default();
        normalizer
            .initialisms
            .extend(extra.into_iter().map(|s| s.as_ref().to_uppercase()));
        normalizer
    }

    pub fn is_initialism(&self, word: &str) -> bool {
        self.initialisms.contains(&word.to_uppercase())
    }

    /// `pet_id` → `PetID`, `http-url` → `HTTPURL`, `ABC` → `Abc`.
    pub fn pascal_case(&self, s: &str) -> String {
        split_words(s)
            .iter()
            .map(|word| self.case_word(word))
            .collect()
    }

    /// Like [`pascal_case`](Self::pascal_case) but the first word is lower-cased.
    pub fn camel_case(&self, s: &str) -> String {
        split_words(s)
            .iter()
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    word.to_lowercase()
                } else {
                    self.case_word(word)
                }
            })
            .collect()
    }

    /// PascalCase that is always a valid exported Go identifier.
    ///
    /// Empty input becomes `X`; a leading digit gets an `X` prefix.
    pub fn identifier(&self, s: &str) -> String {
        let result = self.pascal_case(s);
        match result.chars().next() {
            None => "X".to_string(),
            Some(c) if c.is_ascii_digit() => format!("X{result}"),
            Some(_) => result,
        }
    }

    /// All casing variants of `name`.
    pub fn normalize(&self, name: &str) -> NormalizedName {
        NormalizedName {
            original: name.to_string(),
            pascal_case: self.identifier(name),
            camel_case: escape_keyword(&self.camel_case(name)),
            snake_case: name.to_snake_case(),
            screaming_snake: name.to_shouty_snake_case(),
        }
    }

    fn case_word(&self, word: &str) -> String {
        let upper = word.to_uppercase();
        if self.initialisms.contains(&upper) {
            upper
        } else {
            capitalize(word)
        }
    }
}

/// Append `_` to names that collide with a Go keyword (case-insensitive).
pub fn escape_keyword(s: &str) -> String {
    if GO_KEYWORDS.contains(&s.to_lowercase().as_str()) {
        format!("{s}_")
    } else {
        s.to_string()
    }
}

/// Split on `_`, `-`, space and `.`, and before an upper-case letter that
/// follows a lower-case letter or a digit.
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in s.chars() {
        if matches!(ch, '_' | '-' | ' ' | '.') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = Some(ch);
            continue;
        }

        if ch.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
            && !current.is_empty()
        {
            words.push(std::mem::take(&mut current));
        }

        current.push(ch);
        prev = Some(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// First character upper-case, the rest lower-case.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}
