use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `goapi.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GoapiConfig {
    pub spec: String,
    pub exclude_schemas: Vec<String>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub go: GoConfig,
}

impl Default for GoapiConfig {
    fn default() -> Self {
        Self {
            spec: "openapi.yaml".to_string(),
            exclude_schemas: Vec::new(),
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            go: GoConfig::default(),
        }
    }
}

impl GoapiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spec.is_empty() {
            return Err(ConfigError::Invalid("spec file is required".to_string()));
        }
        if self.go.package.is_empty() {
            return Err(ConfigError::Invalid("package name is required".to_string()));
        }
        if self.go.output_dir.is_empty() {
            return Err(ConfigError::Invalid(
                "output directory is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether an operation with these tags passes the include/exclude filters.
    pub fn accepts_tags(&self, tags: &[String]) -> bool {
        let included = self.include_tags.is_empty()
            || tags.iter().any(|t| self.include_tags.contains(t));
        let excluded = tags.iter().any(|t| self.exclude_tags.contains(t));
        included && !excluded
    }

    pub fn accepts_schema(&self, name: &str) -> bool {
        !self.exclude_schemas.iter().any(|s| s == name)
    }
}

/// Go generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GoConfig {
    pub output_dir: String,
    pub package: String,
    pub server_framework: ServerFramework,
    pub targets: Vec<TargetKind>,
    /// `$ref` → Go module path providing that type.
    pub import_mapping: IndexMap<String, String>,
    pub types: TypesConfig,
    pub output_options: OutputOptions,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            output_dir: "generated".to_string(),
            package: "api".to_string(),
            server_framework: ServerFramework::default(),
            targets: vec![TargetKind::All],
            import_mapping: IndexMap::new(),
            types: TypesConfig::default(),
            output_options: OutputOptions::default(),
        }
    }
}

impl GoConfig {
    /// Configured targets with `all` expanded, de-duplicated, in run order.
    pub fn expanded_targets(&self) -> Vec<TargetKind> {
        let mut out = Vec::new();
        for target in &self.targets {
            let expanded: &[TargetKind] = match target {
                TargetKind::All => &TargetKind::CONCRETE,
                other => std::slice::from_ref(other),
            };
            for t in expanded {
                if !out.contains(t) {
                    out.push(*t);
                }
            }
        }
        out
    }
}

/// Which generation targets to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Types,
    Server,
    StrictServer,
    Client,
    All,
}

impl TargetKind {
    pub const CONCRETE: [TargetKind; 4] = [
        TargetKind::Types,
        TargetKind::Server,
        TargetKind::StrictServer,
        TargetKind::Client,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Types => "types",
            TargetKind::Server => "server",
            TargetKind::StrictServer => "strict-server",
            TargetKind::Client => "client",
            TargetKind::All => "all",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Router flavour for the server targets; decides path parameter syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerFramework {
    Echo,
    Chi,
    #[default]
    Stdlib,
}

impl ServerFramework {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerFramework::Echo => "echo",
            ServerFramework::Chi => "chi",
            ServerFramework::Stdlib => "stdlib",
        }
    }

    /// Convert an OpenAPI path template to the router's syntax.
    ///
    /// Echo: `/pets/{petId}` → `/pets/:petId`. Chi and net/http (Go 1.22+)
    /// share the OpenAPI syntax.
    pub fn convert_path(&self, path: &str) -> String {
        match self {
            ServerFramework::Echo => path.replace('{', ":").replace('}', ""),
            ServerFramework::Chi | ServerFramework::Stdlib => path.to_string(),
        }
    }
}

/// Type mapping options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TypesConfig {
    pub enum_strategy: EnumStrategy,
    pub uuid_package: UuidPackage,
    pub nullable_strategy: NullableStrategy,
    #[serde(rename = "allof-strategy")]
    pub all_of_strategy: AllOfStrategy,
}

/// How enum declarations are rendered by the templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumStrategy {
    #[default]
    Const,
    Type,
    Struct,
}

/// Representation of `format: uuid` strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UuidPackage {
    #[default]
    String,
    Google,
    Gofrs,
}

impl UuidPackage {
    pub fn go_type(&self) -> &'static str {
        match self {
            UuidPackage::String => "string",
            UuidPackage::Google | UuidPackage::Gofrs => "uuid.UUID",
        }
    }

    pub fn import_path(&self) -> Option<&'static str> {
        match self {
            UuidPackage::String => None,
            UuidPackage::Google => Some("github.com/google/uuid"),
            UuidPackage::Gofrs => Some("github.com/gofrs/uuid"),
        }
    }
}

/// How nullable fields are represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullableStrategy {
    /// `*T`
    #[default]
    Pointer,
    /// `nullable.Nullable[T]`
    Nullable,
}

/// How allOf compositions become declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllOfStrategy {
    /// Embed referenced schemas, merge inline members.
    #[default]
    Embed,
    /// Splice every member, references included, into one flat struct.
    Flatten,
}

/// Output tweaks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputOptions {
    pub enable_yaml_tags: bool,
    pub additional_initialisms: Vec<String>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "goapi.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<GoapiConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: GoapiConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r##"# goapi configuration
spec: openapi.yaml
exclude-schemas: []
include-tags: []
exclude-tags: []

go:
  output-dir: generated
  package: api
  server-framework: stdlib       # echo | chi | stdlib
  targets: [all]                 # types | server | strict-server | client | all
  import-mapping: {}
    # "#/components/schemas/Money": github.com/acme/money
  types:
    enum-strategy: const         # const | type | struct
    uuid-package: string         # string | google | gofrs
    nullable-strategy: pointer   # pointer | nullable
    allof-strategy: embed        # embed | flatten
  output-options:
    enable-yaml-tags: false
    additional-initialisms: []
"##
}
