//! entigen CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use entigen_cli::{EntityCommand, LogFormatArg, StyleArg, TemplatesCommand, Workspace};

#[derive(Parser)]
#[command(name = "entigen")]
#[command(version)]
#[command(about = "Generate domain entity classes from templates", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty, global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an entity class for a model
    Entity {
        /// Model name (`PascalCase`, e.g., `Post`, `BlogPost`)
        model: String,
        /// Field definitions (e.g., `title:string`, `published_at:string:date-time`)
        fields: Vec<String>,
        /// Read field definitions from a JSON array file
        #[arg(long, value_name = "FILE")]
        fields_file: Option<PathBuf>,
        /// Table name (defaults to the snake_case plural of the model)
        #[arg(long)]
        table: Option<String>,
        /// Formatting preset (overrides the configured one)
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        /// Project root to write into (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Print the rendered class instead of writing it
        #[arg(long)]
        dry_run: bool,
        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
    /// Inspect and customize templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    entigen::observability::init(cli.verbose, cli.log_format.into())
        .context("Failed to initialize logging")?;

    let project_root = std::env::current_dir().context("Failed to get current directory")?;
    let workspace = Workspace::from_env(project_root);

    match cli.command {
        Commands::Entity {
            model,
            fields,
            fields_file,
            table,
            style,
            output,
            dry_run,
            force,
        } => {
            let cmd = EntityCommand {
                model,
                fields,
                fields_file,
                table,
                style,
                output,
                dry_run,
                force,
            };
            cmd.execute(&workspace)?;
        }
        Commands::Templates { command } => {
            command.execute(&workspace)?;
        }
    }

    Ok(())
}
