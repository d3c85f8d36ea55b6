mod commands;
mod config;
mod server;
mod slack;
mod telemetry;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Command;
use config::QuillConfig;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Personal blog server with article comments")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults to ./quill.toml when present)
    #[arg(long, short, global = true, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = QuillConfig::load(cli.config.as_deref())?;
    telemetry::init(&config.logging)?;

    cli.command.run(config).await
}
