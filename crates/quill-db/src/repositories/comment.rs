//! CommentStore implementation for SQLite

use async_trait::async_trait;
use quill_core::{ArticleId, Comment, CommentStore, CommentTransaction, NewComment, Result};
use sqlx::{Sqlite, Transaction};

use crate::Database;

const INSERT_COMMENT: &str =
    "INSERT INTO comments (id, article_id, username, content) VALUES (?, ?, ?, ?)";

const LIST_BY_ARTICLE: &str = r#"
    SELECT id, article_id, username, content
    FROM comments
    WHERE article_id = ?
    ORDER BY id
"#;

#[async_trait]
impl CommentStore for Database {
    async fn begin(&self) -> Result<Box<dyn CommentTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteCommentTransaction { tx }))
    }

    async fn list_by_article(&self, article_id: ArticleId) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(LIST_BY_ARTICLE)
            .bind(article_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }
}

/// Open SQLite transaction, rolled back when dropped uncommitted
pub struct SqliteCommentTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl CommentTransaction for SqliteCommentTransaction {
    async fn insert(&mut self, comment: &NewComment) -> Result<()> {
        sqlx::query(INSERT_COMMENT)
            .bind(comment.id)
            .bind(comment.article_id)
            .bind(&comment.username)
            .bind(&comment.content)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn list_by_article(&mut self, article_id: ArticleId) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(LIST_BY_ARTICLE)
            .bind(article_id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(comments)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
