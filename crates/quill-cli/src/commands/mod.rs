//! CLI commands for quill

use clap::Subcommand;
use color_eyre::eyre::Result;

use crate::config::QuillConfig;

pub mod comments;
pub mod init;
pub mod serve;

/// All available CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Create the database file and schema
    Init(init::InitCommand),

    /// Start the blog server
    Serve(serve::ServeCommand),

    /// Print the comment thread of an article
    Comments(comments::CommentsCommand),
}

impl Command {
    /// Execute the command
    pub async fn run(self, config: QuillConfig) -> Result<()> {
        match self {
            Command::Init(cmd) => cmd.run(config).await,
            Command::Serve(cmd) => cmd.run(config).await,
            Command::Comments(cmd) => cmd.run(config).await,
        }
    }
}
