//! Create the database and its schema

use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;
use quill_db::Database;

use crate::config::QuillConfig;

/// Create the database file and schema
#[derive(Args)]
pub struct InitCommand {
    /// Database URL, overriding the config file
    #[arg(long, env = "QUILL_DATABASE_URL")]
    pub database_url: Option<String>,
}

impl InitCommand {
    pub async fn run(self, config: QuillConfig) -> Result<()> {
        let mut settings = config.database.settings();
        if let Some(url) = self.database_url {
            settings.url = url;
        }

        if Database::exists(&settings.url) {
            return Err(eyre!(
                "Database already exists at {}",
                style(&settings.url).yellow()
            ));
        }

        let db = Database::connect_with(&settings).await?;
        db.init_schema().await?;
        db.close().await;

        println!(
            "{} Initialized database at {}",
            style("✓").green(),
            style(&settings.url).cyan()
        );
        println!();
        println!("Next steps:");
        println!("  Run {} to start the server", style("quill serve").cyan());

        Ok(())
    }
}
