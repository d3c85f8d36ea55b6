//! Store trait implementations for SQLite

mod comment;

pub use comment::SqliteCommentTransaction;
