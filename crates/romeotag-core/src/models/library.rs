use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Whether a Zotero library belongs to a user account or a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    #[default]
    User,
    Group,
}

impl ScopeKind {
    /// Path segment used by the Zotero API (`users` / `groups`).
    pub fn path_segment(self) -> &'static str {
        match self {
            ScopeKind::User => "users",
            ScopeKind::Group => "groups",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScopeKind::User => "user",
            ScopeKind::Group => "group",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ScopeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(ScopeKind::User),
            "group" | "groups" => Ok(ScopeKind::Group),
            other => Err(CoreError::InvalidScope(other.to_string())),
        }
    }
}

/// A user or group library addressed by its numeric account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryScope {
    pub kind: ScopeKind,
    pub id: String,
}

impl LibraryScope {
    pub fn new(kind: ScopeKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// `users/<id>` or `groups/<id>`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.kind.path_segment(), self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub key: String,
    pub name: String,
}

/// Resolve a human-readable collection name to its internal key.
pub fn resolve_collection_key<'a>(collections: &'a [Collection], name: &str) -> Option<&'a str> {
    collections
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.key.as_str())
}
