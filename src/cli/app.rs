//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::output::{Output, OutputFormat};
use super::{check, convention_cmd, query, resolve_cmd};
use crate::storage::{GlobalConfig, Workspace};

#[derive(Parser)]
#[command(name = "truss")]
#[command(author, version, about = "Declarative build-configuration resolver for multi-module workspaces")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the user config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new truss workspace
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Resolve the workspace (or one module) into a build plan
    Resolve {
        /// Resolve a single module by name or member path
        module: Option<String>,

        /// Write the plan to a file instead of printing it
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate the workspace and report every configuration error
    Check,

    /// List members in evaluation order
    Modules,

    /// Show workspace status overview
    Status,

    /// Explain where a module's resolved version came from
    Explain {
        /// Module name or member path
        module: String,

        /// Coordinate to explain (group:artifact)
        coordinate: String,
    },

    /// Manage conventions
    #[command(subcommand)]
    Convention(convention_cmd::ConventionCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(effective_format(cli.format), cli.verbose);

    output.verbose("Truss starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing workspace at: {}", path));
            let workspace = Workspace::init(&path)?;
            output.success(&format!(
                "Initialized truss workspace at {}",
                workspace.root().display()
            ));
        }

        Commands::Resolve { module, out } => {
            resolve_cmd::run(&output, module.as_deref(), out.as_deref())?
        }

        Commands::Check => check::run(&output)?,

        Commands::Modules => query::modules(&output)?,
        Commands::Status => query::status(&output)?,

        Commands::Explain { module, coordinate } => {
            output.verbose_ctx(
                "explain",
                &format!("Explaining {} in module {}", coordinate, module),
            );
            query::explain(&output, &module, &coordinate)?
        }

        Commands::Convention(cmd) => convention_cmd::run(cmd, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Applies the user-config default when --format is not given
fn effective_format(flag: Option<OutputFormat>) -> OutputFormat {
    if let Some(format) = flag {
        return format;
    }

    match GlobalConfig::load() {
        Ok(config) => match config.default_format {
            crate::storage::OutputFormat::Text => OutputFormat::Text,
            crate::storage::OutputFormat::Json => OutputFormat::Json,
        },
        Err(_) => OutputFormat::Text,
    }
}
