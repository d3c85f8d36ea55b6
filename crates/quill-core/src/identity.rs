//! Anonymous per-browser identities
//!
//! Visitors never register. The first request without an identity cookie is
//! assigned a generated `user_<id>` name which the browser then keeps sending.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::IdGenerator;

/// Name of the cookie carrying the username
pub const COOKIE_NAME: &str = "QUILL_USERNAME";

/// Avatar shown for usernames that were not generated by us
pub const DEFAULT_AVATAR_URL: &str = "https://avatars.githubusercontent.com/u/2878733?v=4";

const GENERATED_PREFIX: &str = "user";
const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Generate a fresh `user_<id>` name
    pub fn generate(ids: &IdGenerator) -> Self {
        Self(format!("{}_{}", GENERATED_PREFIX, ids.next_id()))
    }

    /// Accept a client-supplied name, rejecting blank or oversized values
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > MAX_USERNAME_LEN {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Username resolved for one request
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: Username,
    /// Set when the name was generated for this request and has to be
    /// handed back to the client
    pub is_new: bool,
}

impl Identity {
    /// Use the cookie value if there is a usable one, otherwise generate a name
    pub fn resolve(cookie: Option<&str>, ids: &IdGenerator) -> Self {
        match cookie.and_then(Username::parse) {
            Some(username) => Self {
                username,
                is_new: false,
            },
            None => Self {
                username: Username::generate(ids),
                is_new: true,
            },
        }
    }
}

/// Avatar image for a username
///
/// Generated names get a stable robohash picture keyed by their numeric part.
pub fn avatar_url(username: &str) -> String {
    let mut parts = username.split('_');
    let (Some(_), Some(number), None) = (parts.next(), parts.next(), parts.next()) else {
        return DEFAULT_AVATAR_URL.to_string();
    };

    match number.parse::<u64>() {
        Ok(id) => format!("https://robohash.org/{}?set=set4", id),
        Err(_) => DEFAULT_AVATAR_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_cookie_value() {
        let ids = IdGenerator::new(1).unwrap();
        let identity = Identity::resolve(Some("user_42"), &ids);

        assert_eq!(identity.username.as_str(), "user_42");
        assert!(!identity.is_new);
    }

    #[test]
    fn test_resolve_generates_when_missing() {
        let ids = IdGenerator::new(1).unwrap();

        for cookie in [None, Some(""), Some("   ")] {
            let identity = Identity::resolve(cookie, &ids);
            assert!(identity.is_new);
            assert!(identity.username.as_str().starts_with("user_"));
        }
    }

    #[test]
    fn test_resolve_rejects_oversized_cookie() {
        let ids = IdGenerator::new(1).unwrap();
        let long = "x".repeat(MAX_USERNAME_LEN + 1);

        assert!(Identity::resolve(Some(&long), &ids).is_new);
    }

    #[test]
    fn test_generated_names_are_unique() {
        let ids = IdGenerator::new(1).unwrap();

        assert_ne!(Username::generate(&ids), Username::generate(&ids));
    }

    #[test]
    fn test_avatar_url_for_generated_name() {
        assert_eq!(
            avatar_url("user_1417231583613554688"),
            "https://robohash.org/1417231583613554688?set=set4"
        );
    }

    #[test]
    fn test_avatar_url_falls_back() {
        for name in ["alice", "user_abc", "user_1_2", "user_"] {
            assert_eq!(avatar_url(name), DEFAULT_AVATAR_URL, "{name}");
        }
    }
}
