//! Entry types stored inside a vault.
//!
//! Only `id`, `name`, `category` and the timestamps live in plaintext
//! columns.  Everything else is serialized into an `EntryPayload`, which
//! is encrypted before it reaches the database.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Category given to entries created without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A fully decrypted vault entry.
#[derive(Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("tags", &self.tags)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// The fields a caller supplies when creating an entry.
#[derive(Clone, Default)]
pub struct NewEntry {
    pub name: String,
    /// Empty means `general`.
    pub category: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    pub tags: Vec<String>,
}

impl NewEntry {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            ..Self::default()
        }
    }
}

/// Lightweight metadata about an entry (nothing secret).
///
/// Returned by `Vault::list_entries` so callers can display entries
/// without a key and without touching any ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The encrypted part of an entry, as serialized JSON.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub(crate) struct EntryPayload {
    #[serde(default)]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Build the text that lookups match against:
/// name, category, tags, username and URL separated by spaces.
pub(crate) fn search_text(
    name: &str,
    category: &str,
    tags: &[String],
    username: &str,
    url: &str,
) -> String {
    let mut text = format!("{name} {category}");
    for tag in tags {
        text.push(' ');
        text.push_str(tag);
    }
    text.push(' ');
    text.push_str(username);
    text.push(' ');
    text.push_str(url);
    text
}

/// Substitute the default category for an empty one.
pub(crate) fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let now = Utc::now();
        let entry = Entry {
            id: "1".into(),
            name: "github.com".into(),
            category: "dev".into(),
            username: "octo".into(),
            password: "hunter2".into(),
            url: String::new(),
            notes: "private note".into(),
            tags: vec![],
            created_at: now,
            updated_at: now,
        };
        let shown = format!("{entry:?}");
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("private note"));
        assert!(shown.contains("github.com"));
    }

    #[test]
    fn search_text_joins_fields() {
        let text = search_text(
            "github.com",
            "dev",
            &["work".into(), "code".into()],
            "octo",
            "https://github.com",
        );
        assert_eq!(text, "github.com dev work code octo https://github.com");
    }

    #[test]
    fn empty_category_becomes_general() {
        assert_eq!(normalize_category("  "), DEFAULT_CATEGORY);
        assert_eq!(normalize_category(" email "), "email");
    }
}
