//! jsl CLI - inspect Sapling-to-git translations
//!
//! Usage:
//!   jsl translate <verb> [args..]   Print the git invocation as JSON
//!   jsl transform <verb> [args..]   Reshape git output read from stdin
//!   jsl init                        Write a default .jsl/config.toml

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jsl_core::JslConfig;
use jsl_git::{CommandRequest, GitCommand, RepositoryContext};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "jsl")]
#[command(author, version, about = "Sapling command translation for git repositories")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Repository working directory
    #[arg(short = 'C', long, default_value = ".")]
    cwd: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the git invocation for a Sapling command
    Translate {
        /// Sapling verb followed by its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },

    /// Apply a Sapling command's output transform to git output on stdin
    Transform {
        /// Sapling verb followed by its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },

    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the translated output
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Translate { argv } => cmd_translate(&cli.cwd, argv),
        Commands::Transform { argv } => cmd_transform(&cli.cwd, argv).await,
        Commands::Init => cmd_init(&cli.cwd),
    }
}

fn load_context(cwd: &Path) -> Result<RepositoryContext> {
    let config = JslConfig::load_or_default(cwd).context("Failed to load .jsl/config.toml")?;
    Ok(RepositoryContext::from_process_env(cwd, config))
}

fn parse_request(argv: Vec<String>) -> Result<CommandRequest> {
    match CommandRequest::from_argv(argv) {
        Some(request) => Ok(request),
        None => bail!("A Sapling verb is required"),
    }
}

fn cmd_translate(cwd: &Path, argv: Vec<String>) -> Result<()> {
    let ctx = load_context(cwd)?;
    let translation = parse_request(argv)?.translate(&ctx);

    println!("{}", serde_json::to_string_pretty(&translation)?);
    Ok(())
}

async fn cmd_transform(cwd: &Path, argv: Vec<String>) -> Result<()> {
    let ctx = load_context(cwd)?;
    let translation = parse_request(argv)?.translate(&ctx);

    let mut captured = String::new();
    std::io::stdin()
        .read_to_string(&mut captured)
        .context("Failed to read git output from stdin")?;

    let output = match &translation.output_transform {
        Some(transform) => transform.apply(&captured, &GitCommand::new(&ctx)).await,
        None => {
            info!("No output transform for this command; echoing input");
            captured
        }
    };

    print!("{}", output);
    Ok(())
}

fn cmd_init(cwd: &Path) -> Result<()> {
    JslConfig::write_default(cwd).context("Failed to write .jsl/config.toml")?;
    info!("Wrote {}", cwd.join(".jsl/config.toml").display());
    Ok(())
}
