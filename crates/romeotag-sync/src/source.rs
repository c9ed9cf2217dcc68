//! Capability seams between the reconciliation pipeline and the outside world.

use async_trait::async_trait;
use serde_json::Value;

use romeotag_core::{Collection, ConcurrencyToken, LibraryScope, PolicyLookup, Record};

use crate::error::Result;

/// Which library (and optionally which collection) to read candidates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    pub scope: LibraryScope,
    pub collection: Option<String>,
}

impl ItemQuery {
    pub fn new(scope: LibraryScope) -> Self {
        Self {
            scope,
            collection: None,
        }
    }

    pub fn in_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// One page of journal articles, most recently modified first.
    async fn fetch_page(&self, query: &ItemQuery, start: u32, limit: u32) -> Result<Vec<Record>>;

    async fn list_collections(&self, scope: &LibraryScope) -> Result<Vec<Collection>>;
}

#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// Replace the item `key` with `body`, only if its version still matches
    /// `if_match`. Returns the response status code.
    async fn update_record(
        &self,
        scope: &LibraryScope,
        key: &str,
        if_match: &ConcurrencyToken,
        body: &Value,
    ) -> Result<u16>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryQuery<'a> {
    Issn(&'a str),
    Title(&'a str),
}

impl RegistryQuery<'_> {
    pub fn value(&self) -> &str {
        match self {
            RegistryQuery::Issn(v) | RegistryQuery::Title(v) => v,
        }
    }
}

impl std::fmt::Display for RegistryQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryQuery::Issn(v) => write!(f, "issn:{v}"),
            RegistryQuery::Title(v) => write!(f, "jtitle:{v}"),
        }
    }
}

#[async_trait]
pub trait PolicyRegistry: Send + Sync {
    async fn lookup(&self, query: RegistryQuery<'_>) -> Result<PolicyLookup>;
}
