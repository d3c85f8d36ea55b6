//! Comment entity models
//!
//! `Comment` is the read model (with `FromRow`), `NewComment` the write model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{ArticleId, CommentId};

/// A comment left on an article
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub username: String,
    pub content: String,
}

/// Input for creating a new comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub username: String,
    pub content: String,
}
