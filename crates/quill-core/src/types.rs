use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// =============================================================================
// ID Newtypes
// =============================================================================

/// Article identifier
///
/// Articles are addressed by unsigned decimal ids in URLs. Values are kept
/// as `i64` because that is what the store can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(transparent)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let not_numeric = || Error::bad_request("id should be a number");

        // u64::from_str tolerates a leading '+', URLs should not
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(not_numeric());
        }

        let value: u64 = s.parse().map_err(|_| not_numeric())?;
        let value = i64::try_from(value).map_err(|_| not_numeric())?;
        Ok(Self(value))
    }
}

impl From<i64> for ArticleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<ArticleId> for i64 {
    fn from(value: ArticleId) -> Self {
        value.0
    }
}

/// Comment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type)]
#[sqlx(transparent)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CommentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CommentId> for i64 {
    fn from(value: CommentId) -> Self {
        value.0
    }
}
