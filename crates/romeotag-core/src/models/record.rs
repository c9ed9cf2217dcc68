use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

const ISSN_FIELD: &str = "ISSN";
const TITLE_FIELD: &str = "publicationTitle";
const EXTRA_FIELD: &str = "extra";

/// Opaque version token (Zotero etag) that makes a write conditional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Run-cache key: ISSN followed by title, whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Returns `None` when both parts are absent.
    pub fn derive(issn: Option<&str>, title: Option<&str>) -> Option<Self> {
        if issn.is_none() && title.is_none() {
            return None;
        }
        let key = issn
            .unwrap_or_default()
            .chars()
            .chain(title.unwrap_or_default().chars())
            .filter(|c| !c.is_whitespace())
            .collect();
        Some(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A journal article as fetched from Zotero.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub issn: Option<String>,
    pub title: Option<String>,
    extra: String,
    pub etag: ConcurrencyToken,
    payload: Value,
}

impl Record {
    /// Build a record from the JSON item payload of a feed entry.
    ///
    /// Blank `ISSN` / `publicationTitle` values are treated as absent.
    pub fn from_payload(key: impl Into<String>, etag: ConcurrencyToken, payload: Value) -> Result<Self> {
        let key = key.into();
        let Some(obj) = payload.as_object() else {
            return Err(CoreError::InvalidPayload {
                key,
                reason: "item content is not a JSON object".to_string(),
            });
        };

        let str_field = |name: &str| {
            obj.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
        };

        let issn = str_field(ISSN_FIELD);
        let title = str_field(TITLE_FIELD);
        let extra = obj
            .get(EXTRA_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            key,
            issn,
            title,
            extra,
            etag,
            payload,
        })
    }

    pub fn identity_key(&self) -> Option<IdentityKey> {
        IdentityKey::derive(self.issn.as_deref(), self.title.as_deref())
    }

    pub fn extra(&self) -> &str {
        &self.extra
    }

    /// Replace the annotation text, keeping the payload in step.
    pub fn set_extra(&mut self, extra: String) {
        if let Some(obj) = self.payload.as_object_mut() {
            obj.insert(EXTRA_FIELD.to_string(), Value::String(extra.clone()));
        }
        self.extra = extra;
    }

    /// The item JSON as it should be written back.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Title for log lines, empty when unknown.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}
