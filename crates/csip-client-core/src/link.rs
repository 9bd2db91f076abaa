//! Hyperlinks between resources.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A reference from one resource to another.
///
/// Two links are the same link iff their `href` values are equal. Attributes
/// that list links carry (such as `all`) are kept for display only and take
/// no part in equality, ordering, or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Absolute or server-relative URI of the target resource
    #[serde(rename = "@href")]
    pub href: String,
    /// Number of entries behind a list link, when the server reports it
    #[serde(rename = "@all", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<u32>,
}

impl Link {
    /// Create a link to `href`.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            all: None,
        }
    }

    /// The target URI.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.href == other.href
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.href.hash(state);
    }
}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> Ordering {
        self.href.cmp(&other.href)
    }
}

impl From<&str> for Link {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Self::new(href)
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.href)
    }
}
