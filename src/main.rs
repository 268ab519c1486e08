//! CLI entry point for vellum

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "vellum")]
#[command(version)]
#[command(about = "Compile markdown content collections", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, validate, and emit the content collections
    #[command(alias = "b")]
    Build {
        /// Remove the data and asset output directories first
        #[arg(long)]
        clean: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "vellum=debug,info"
    } else {
        "vellum=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build { clean } => {
            let vellum = vellum::Vellum::new(&base_dir)?;
            let collections = vellum.build(clean)?;
            println!(
                "Built {} posts, {} pages, {} authors",
                collections.posts.len(),
                collections.pages.len(),
                collections.authors.len()
            );
        }
    }

    Ok(())
}
