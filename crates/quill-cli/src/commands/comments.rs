//! Print an article's comment thread

use std::sync::Arc;

use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;
use quill_core::{CommentService, DatabaseHandle, IdGenerator, NoopNotifier, NotificationSettings};
use quill_db::Database;

use crate::config::QuillConfig;

/// Print the comment thread of an article
#[derive(Args)]
pub struct CommentsCommand {
    /// Numeric article id
    pub article_id: String,

    /// Database URL, overriding the config file
    #[arg(long, env = "QUILL_DATABASE_URL")]
    pub database_url: Option<String>,
}

impl CommentsCommand {
    pub async fn run(self, config: QuillConfig) -> Result<()> {
        let mut settings = config.database.settings();
        if let Some(url) = self.database_url {
            settings.url = url;
        }

        if !Database::exists(&settings.url) {
            return Err(eyre!(
                "Database not found. Run {} first.",
                style("quill init").yellow()
            ));
        }

        let db = Arc::new(Database::connect_with(&settings).await?);
        let service = CommentService::new(
            Arc::new(DatabaseHandle::ready(Arc::clone(&db))),
            Arc::new(IdGenerator::new(config.server.machine_id)?),
            Arc::new(NoopNotifier),
            NotificationSettings {
                channel_id: config.slack.channel_id,
                site_url: config.server.site_url,
            },
        );

        let comments = service.list_comments(&self.article_id).await?;
        db.close().await;

        if comments.is_empty() {
            println!("No comments found for article {}.", self.article_id);
            return Ok(());
        }

        println!("{:<20} {:<28} {}", "Id", "Author", "Comment");
        println!("{}", "-".repeat(80));

        for comment in &comments {
            println!(
                "{:<20} {:<28} {}",
                comment.id,
                style(&comment.username).cyan(),
                comment.content.replace('\n', " ")
            );
        }

        println!();
        println!("Total: {} comment(s)", comments.len());

        Ok(())
    }
}
