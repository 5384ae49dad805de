use anyhow::{bail, Context, Result};
use appforge_catalog::Catalog;
use appforge_codegen::{generate_with, CodegenResult, GeneratedFile, GeneratorConfig};
use appforge_core::AppDefinition;
use appforge_tokens::{DesignTokens, TokenInputs};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "appforge")]
#[command(about = "Generate SwiftUI app sources from an app definition")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the source tree of an app
    Generate {
        /// App definition (JSON)
        app: PathBuf,
        /// Directory the sources are written into
        #[arg(short, long)]
        out: PathBuf,
        /// Generator configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate an app definition and report warnings without writing files
    Check {
        /// App definition (JSON)
        app: PathBuf,
        /// Generator configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the design tokens derived from an app's appearance as JSON
    Tokens {
        /// App definition (JSON)
        app: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing(cli.verbose);

    match cli.command {
        Command::Generate { app, out, config } => cmd_generate(&app, &out, config.as_deref()),
        Command::Check { app, config } => cmd_check(&app, config.as_deref()),
        Command::Tokens { app } => cmd_tokens(&app),
    }
}

fn install_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_app(path: &Path) -> Result<AppDefinition> {
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("parsing app definition {}", path.display()))
}

fn read_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    GeneratorConfig::from_toml_str(&source).with_context(|| format!("loading generator config {}", path.display()))
}

fn run(app: &Path, config: Option<&Path>) -> Result<CodegenResult> {
    let definition = read_app(app)?;
    let config = read_config(config)?;
    debug!(?config, "loaded generator config");
    Ok(generate_with(&definition, Catalog::standard(), &config)?)
}

fn print_warnings(result: &CodegenResult) {
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
}

fn cmd_generate(app: &Path, out: &Path, config: Option<&Path>) -> Result<()> {
    let result = run(app, config)?;
    print_warnings(&result);
    write_files(out, &result.files)?;
    info!(out = %out.display(), files = result.files.len(), "wrote sources");
    eprintln!("Generated {} file(s) in {}", result.files.len(), out.display());
    Ok(())
}

fn cmd_check(app: &Path, config: Option<&Path>) -> Result<()> {
    let result = run(app, config)?;
    print_warnings(&result);
    for file in &result.files {
        println!("{}", file.path);
    }
    eprintln!("OK: {} ({} warning(s))", app.display(), result.warnings.len());
    Ok(())
}

fn cmd_tokens(app: &Path) -> Result<()> {
    let definition = read_app(app)?;
    let tokens = DesignTokens::generate(
        &definition.config.name,
        &definition.config.version,
        &TokenInputs::from_appearance(&definition.config.appearance),
    );
    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(())
}

/// Write every file below `out`, creating directories as needed.
fn write_files(out: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let relative = Path::new(&file.path);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            bail!("refusing to write outside the output directory: {}", file.path);
        }
        let target = out.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&target, &file.content).with_context(|| format!("writing {}", target.display()))?;
        debug!(path = %target.display(), bytes = file.content.len(), "wrote file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = r#"{
        "config": {"name": "Pocket", "bundleId": "com.example.pocket"},
        "screens": [
            {"id": "home", "name": "Home", "root": {"id": "root", "type": "Text", "props": {"content": "Hi"}}}
        ],
        "entryScreen": "home"
    }"#;

    #[test]
    fn test_generate_writes_tree() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.json");
        std::fs::write(&app, APP).unwrap();
        let out = dir.path().join("out");

        cmd_generate(&app, &out, None).unwrap();

        let view = std::fs::read_to_string(out.join("Pocket/Views/HomeView.swift")).unwrap();
        assert!(view.starts_with("import SwiftUI\n"));
        assert!(out.join("Pocket/PocketApp.swift").exists());
    }

    #[test]
    fn test_config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.json");
        std::fs::write(&app, APP).unwrap();
        let config = dir.path().join("appforge.toml");
        std::fs::write(&config, "emit_previews = false\n").unwrap();

        let result = run(&app, Some(&config)).unwrap();
        assert!(!result.files[0].content.contains("#Preview"));
    }

    #[test]
    fn test_bad_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("appforge.toml");
        std::fs::write(&config, "indent_width = 0\n").unwrap();
        let err = read_config(Some(&config)).unwrap_err();
        assert!(format!("{err:#}").contains("indent_width"));
    }

    #[test]
    fn test_write_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let files = [GeneratedFile {
            path: "../escape.swift".to_string(),
            content: String::new(),
        }];
        assert!(write_files(dir.path(), &files).is_err());
        assert!(!dir.path().join("../escape.swift").exists());
    }
}
