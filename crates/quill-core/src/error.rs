use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database not initialized")]
    DatabaseNotReady,

    #[error("Database already initialized")]
    DatabaseAlreadyReady,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Database(_) => "DATABASE_ERROR",
            Error::DatabaseNotReady => "DATABASE_NOT_READY",
            Error::DatabaseAlreadyReady => "DATABASE_ALREADY_READY",
            Error::Config(_) => "CONFIG_ERROR",
            Error::BadRequest(_) => "BAD_REQUEST",
            Error::Notification(_) => "NOTIFICATION_ERROR",
            Error::InconsistentState(_) => "INCONSISTENT_STATE",
        }
    }

    /// Whether this error originates from the store (or its absence)
    pub fn is_database(&self) -> bool {
        matches!(self, Error::Database(_) | Error::DatabaseNotReady)
    }

    /// Whether the caller is at fault
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::BadRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
