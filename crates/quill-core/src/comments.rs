//! Comment service
//!
//! Writes go through a single transaction that inserts the new comment and
//! reads the article's thread back before committing, so the caller always
//! sees its own comment. The chat notification is sent afterwards on a
//! detached task and can never fail the request.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::handle::DatabaseHandle;
use crate::id::IdGenerator;
use crate::identity::Username;
use crate::models::{Comment, NewComment};
use crate::notifier::Notifier;
use crate::repository::CommentStore;
use crate::types::{ArticleId, CommentId};

/// Maximum accepted comment length, in characters
pub const MAX_CONTENT_CHARS: usize = 4000;

/// Where and how new comments are announced
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// Chat channel receiving the announcements
    pub channel_id: String,
    /// Public base URL of the blog, without trailing slash
    pub site_url: String,
}

impl NotificationSettings {
    pub fn article_url(&self, article_id: ArticleId) -> String {
        format!(
            "{}/p/public/articles/{}",
            self.site_url.trim_end_matches('/'),
            article_id
        )
    }

    pub fn message(&self, article_id: ArticleId, content: &str) -> String {
        format!(
            "New comment for article *{}* was added:\n>{}\n>{}",
            article_id,
            self.article_url(article_id),
            content
        )
    }
}

/// Create and list article comments
pub struct CommentService<S: ?Sized> {
    db: Arc<DatabaseHandle<S>>,
    ids: Arc<IdGenerator>,
    notifier: Arc<dyn Notifier>,
    settings: NotificationSettings,
}

impl<S: CommentStore + ?Sized> CommentService<S> {
    pub fn new(
        db: Arc<DatabaseHandle<S>>,
        ids: Arc<IdGenerator>,
        notifier: Arc<dyn Notifier>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            db,
            ids,
            notifier,
            settings,
        }
    }

    /// The id generator, shared with identity resolution
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// The database handle this service reads through
    pub fn handle(&self) -> &DatabaseHandle<S> {
        &self.db
    }

    /// Store a comment and return the article's full thread, including it
    ///
    /// An empty thread after a successful commit is logged and returned as is;
    /// the comment is stored either way.
    pub async fn create_comment(
        &self,
        article_id: &str,
        username: &Username,
        content: &str,
    ) -> Result<Vec<Comment>> {
        let article_id: ArticleId = article_id.parse()?;
        let content = validate_content(content)?;

        let db = self.db.acquire()?;
        let mut tx = db.begin().await?;

        let comment = NewComment {
            id: CommentId(self.ids.next_id()),
            article_id,
            username: username.as_str().to_string(),
            content: content.to_string(),
        };
        tx.insert(&comment).await?;

        let comments = tx.list_by_article(article_id).await?;
        tx.commit().await?;

        info!(%article_id, comment_id = %comment.id, "comment created");
        self.notify(article_id, content);

        if comments.is_empty() {
            let err = Error::InconsistentState(format!(
                "no comments found for article {} after creating comment {}",
                article_id, comment.id
            ));
            warn!(error = %err, "empty thread after insert");
        }

        Ok(comments)
    }

    /// List the article's comments, oldest first
    pub async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>> {
        let article_id: ArticleId = article_id.parse()?;
        let db = self.db.acquire()?;

        db.list_by_article(article_id).await
    }

    fn notify(&self, article_id: ArticleId, content: &str) {
        let notifier = Arc::clone(&self.notifier);
        let channel_id = self.settings.channel_id.clone();
        let text = self.settings.message(article_id, content);

        tokio::spawn(async move {
            if let Err(err) = notifier.send(&channel_id, &text).await {
                error!(error = %err, %article_id, "failed to send comment notification");
            }
        });
    }
}

/// Trim a comment body and check it is non-empty and not oversized
pub fn validate_content(content: &str) -> Result<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::bad_request("comment must not be empty"));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(Error::bad_request(format!(
            "comment must be at most {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(content)
}
