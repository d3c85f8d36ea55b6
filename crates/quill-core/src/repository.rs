//! Store traits for comment persistence
//!
//! The comment service only talks to these traits, which keeps the
//! transactional flow testable without a real database and leaves room for
//! other backends.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Comment, NewComment};
use crate::types::ArticleId;

/// Store holding article comments
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> Result<Box<dyn CommentTransaction>>;

    /// List all comments of an article, oldest first
    async fn list_by_article(&self, article_id: ArticleId) -> Result<Vec<Comment>>;
}

/// An open transaction against a [`CommentStore`]
///
/// Dropping a transaction without calling [`CommentTransaction::commit`]
/// rolls it back.
#[async_trait]
pub trait CommentTransaction: Send {
    /// Insert a single comment
    async fn insert(&mut self, comment: &NewComment) -> Result<()>;

    /// List all comments of an article, oldest first, including rows
    /// written earlier in this transaction
    async fn list_by_article(&mut self, article_id: ArticleId) -> Result<Vec<Comment>>;

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;
}
