//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use invsweep_core::{SweepConfig, SweepError};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init(InitArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, explicit: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(explicit),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Path => show_path(explicit),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invsweep")
        .join("config.json")
}

/// Resolve the effective configuration.
///
/// An explicit path must exist; the default path is used only when present.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<SweepConfig> {
    let config = match explicit {
        Some(path) => read(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                read(&path)?
            } else {
                debug!("No config file at {}, using defaults", path.display());
                SweepConfig::default()
            }
        }
    };

    config.validate().map_err(SweepError::Config)?;
    Ok(config)
}

fn read(path: &Path) -> anyhow::Result<SweepConfig> {
    debug!("Loading config from {}", path.display());
    SweepConfig::from_file(path)
        .map_err(|e| SweepError::Config(format!("{}: {}", path.display(), e)).into())
}

fn show_config(explicit: Option<&Path>) -> anyhow::Result<()> {
    if explicit.is_none() && !default_config_path().exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let config = load(explicit)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    SweepConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path(explicit: Option<&Path>) -> anyhow::Result<()> {
    let config_path = explicit.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'invsweep config init' to create a configuration file.");
    }

    Ok(())
}
