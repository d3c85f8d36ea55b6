use sqlx::SqlitePool;

use crate::error::Error;

/// SQL schema for initializing the database
pub const SCHEMA: &str = r#"
-- Article comments, ids are snowflakes so ordering by id is creation order
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY,
    article_id INTEGER NOT NULL,
    username TEXT NOT NULL,
    content TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_article ON comments(article_id, id);
"#;

/// Initialize the database schema
pub async fn init_schema(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
