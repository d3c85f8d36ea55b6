pub mod comments;
pub mod error;
pub mod handle;
pub mod id;
pub mod identity;
pub mod models;
pub mod notifier;
pub mod repository;
pub mod schema;
pub mod types;

pub use comments::{validate_content, CommentService, NotificationSettings, MAX_CONTENT_CHARS};
pub use error::{Error, Result};
pub use handle::DatabaseHandle;
pub use id::IdGenerator;
pub use identity::{avatar_url, Identity, Username, COOKIE_NAME};
pub use models::{Comment, NewComment};
pub use notifier::{NoopNotifier, Notifier};
pub use repository::{CommentStore, CommentTransaction};
pub use types::*;
