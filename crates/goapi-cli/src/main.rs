use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use goapi_core::config::{self, CONFIG_FILE_NAME, GoapiConfig};
use goapi_core::model::{self, Spec};
use goapi_core::{GeneratedFile, GenerationOutput, Generator};

#[derive(Parser)]
#[command(name = "goapi", about = "Go type and scaffold generator for API descriptions", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every configured target and write its declarations
    Generate {
        /// Path to the canonical schema document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print a summary of the declarations each target produces
    Inspect {
        /// Path to the canonical schema document
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new goapi configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, config } => cmd_generate(input, config),

        Commands::Inspect {
            input,
            config,
            format,
        } => cmd_inspect(input, config, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "goapi", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config from `path`, or `goapi.yaml` in the current directory.
/// A missing default file falls back to built-in defaults.
fn load_config(path: Option<PathBuf>) -> Result<GoapiConfig> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let cfg = match config::load_config(&config_path)? {
        Some(cfg) => cfg,
        None if explicit => {
            anyhow::bail!("config file {} not found", config_path.display())
        }
        None => GoapiConfig::default(),
    };
    cfg.validate()
        .with_context(|| format!("invalid config {}", config_path.display()))?;
    Ok(cfg)
}

fn load_spec(path: &Path) -> Result<Spec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let spec = match ext {
        "json" => model::from_json(&content),
        _ => model::from_yaml(&content),
    }
    .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(spec)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(input: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let cfg = load_config(config)?;
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.spec));
    let spec = load_spec(&input)?;

    let output = Generator::new(&cfg).generate(&spec);
    if output.targets.is_empty() {
        eprintln!("No targets configured. Add `go.targets` to your config.");
        return Ok(());
    }

    let output_dir = PathBuf::from(&cfg.go.output_dir);
    eprintln!("Generating {} → {}", input.display(), output_dir.display());
    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;

    let files = output
        .to_files()
        .context("failed to serialize generated declarations")?;
    write_files(&output_dir, &files)?;
    info!(
        "{} targets, {} declarations",
        output.targets.len(),
        output
            .targets
            .iter()
            .map(|t| t.declarations.len())
            .sum::<usize>()
    );

    eprintln!(
        "Generated {} files in {}",
        files.len(),
        output_dir.display()
    );
    Ok(())
}

fn cmd_inspect(input: PathBuf, config: Option<PathBuf>, format: InspectFormat) -> Result<()> {
    let cfg = load_config(config)?;
    let spec = load_spec(&input)?;
    let output = Generator::new(&cfg).generate(&spec);

    let summary = build_inspect_summary(&spec, &output);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(spec: &Spec, output: &GenerationOutput) -> serde_json::Value {
    let targets: Vec<serde_json::Value> = output
        .targets
        .iter()
        .map(|target| {
            let declarations: Vec<serde_json::Value> = target
                .declarations
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "name": d.name,
                        "kind": d.kind(),
                    })
                })
                .collect();
            serde_json::json!({
                "target": target.target,
                "declarations": declarations,
                "imports": target.imports.iter().map(|i| &i.path).collect::<Vec<_>>(),
                "operations": target.operations.iter().map(|op| &op.go_name).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": spec.info.title,
            "version": spec.info.version,
        },
        "schemas": spec.schemas.len(),
        "operations": spec.operations.len(),
        "targets": targets,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
