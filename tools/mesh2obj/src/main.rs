//! mesh2obj - converts a mesh file into model.obj and model_geom.obj

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use mesh2obj::{process, InvocationConfig};

#[derive(Parser)]
#[command(name = "mesh2obj")]
#[command(about = "Convert a glTF/GLB/OBJ mesh into model.obj and model_geom.obj")]
#[command(version)]
struct Cli {
    /// Path to the input mesh file (glTF/GLB/OBJ)
    #[arg(short, long)]
    file: PathBuf,

    /// Directory to save the output OBJ files
    #[arg(short, long)]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for InvocationConfig {
    fn from(cli: Cli) -> Self {
        Self {
            file_path: cli.file,
            output_dir: cli.output,
            verbose: cli.verbose,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = InvocationConfig::from(Cli::parse());
    process(&config)?;

    Ok(())
}
