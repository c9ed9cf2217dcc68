use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use romeotag_core::{
    Collection, ConcurrencyToken, LibraryScope, PolicyLookup, Publisher, Record, ScopeKind,
};

use crate::error::{Result, SyncError};
use crate::source::{ItemQuery, PolicyRegistry, RecordSource, RecordWriter, RegistryQuery};

pub fn query() -> ItemQuery {
    ItemQuery::new(scope())
}

pub fn scope() -> LibraryScope {
    LibraryScope::new(ScopeKind::User, "475425")
}

pub fn record(key: &str, issn: Option<&str>, title: Option<&str>, extra: &str) -> Record {
    let mut payload = json!({ "itemType": "journalArticle", "extra": extra });
    if let Some(issn) = issn {
        payload["ISSN"] = Value::String(issn.to_string());
    }
    if let Some(title) = title {
        payload["publicationTitle"] = Value::String(title.to_string());
    }
    Record::from_payload(key, ConcurrencyToken::new(format!("etag-{key}")), payload).unwrap()
}

pub fn lookup(source_key: &str, publishers: Vec<Publisher>) -> PolicyLookup {
    PolicyLookup {
        source_key: source_key.to_string(),
        hits: publishers.len() as u32,
        publishers,
    }
}

// ─── FakeSource ───────────────────────────────────────────────────────────────

pub struct FakeSource {
    records: Vec<Record>,
    collections: Vec<Collection>,
    cap: Option<u32>,
    fail_at: Option<u32>,
    calls: Mutex<Vec<(u32, u32)>>,
}

impl FakeSource {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            collections: Vec::new(),
            cap: None,
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_total(total: usize) -> Self {
        let records = (0..total)
            .map(|i| record(&format!("ITEM{i:04}"), Some("1234-5678"), None, ""))
            .collect();
        Self::with_records(records)
    }

    pub fn with_collections(mut self, collections: &[(&str, &str)]) -> Self {
        self.collections = collections
            .iter()
            .map(|(key, name)| Collection {
                key: key.to_string(),
                name: name.to_string(),
            })
            .collect();
        self
    }

    /// Serve at most `cap` records per page, whatever limit is asked for.
    pub fn capped_at(mut self, cap: u32) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn failing_at(mut self, start: u32) -> Self {
        self.fail_at = Some(start);
        self
    }

    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn fetch_page(&self, _query: &ItemQuery, start: u32, limit: u32) -> Result<Vec<Record>> {
        self.calls.lock().unwrap().push((start, limit));
        if self.fail_at == Some(start) {
            return Err(SyncError::Api {
                endpoint: "fake://items".to_string(),
                status: 500,
                body: String::new(),
            });
        }
        Ok(self
            .records
            .iter()
            .skip(start as usize)
            .take(limit.min(self.cap.unwrap_or(limit)) as usize)
            .cloned()
            .collect())
    }

    async fn list_collections(&self, _scope: &LibraryScope) -> Result<Vec<Collection>> {
        Ok(self.collections.clone())
    }
}

// ─── FakeRegistry ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeRegistry {
    answers: HashMap<String, PolicyLookup>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn answer(mut self, query: RegistryQuery<'_>, lookup: PolicyLookup) -> Self {
        self.answers.insert(query.to_string(), lookup);
        self
    }

    pub fn fail_on(mut self, query: RegistryQuery<'_>) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PolicyRegistry for FakeRegistry {
    async fn lookup(&self, query: RegistryQuery<'_>) -> Result<PolicyLookup> {
        let id = query.to_string();
        self.calls.lock().unwrap().push(id.clone());
        if self.failing.contains(&id) {
            return Err(SyncError::Api {
                endpoint: "fake://romeo".to_string(),
                status: 503,
                body: String::new(),
            });
        }
        Ok(self
            .answers
            .get(&id)
            .cloned()
            .unwrap_or_else(|| lookup(query.value(), Vec::new())))
    }
}

// ─── FakeWriter ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub key: String,
    pub if_match: String,
    pub body: Value,
}

/// Accepts a write with 204 when `if_match` equals the stored version,
/// 412 otherwise. Versions default to `etag-<key>`.
#[derive(Default)]
pub struct FakeWriter {
    versions: HashMap<String, String>,
    forced: HashMap<String, u16>,
    broken: HashSet<String>,
    writes: Mutex<Vec<WriteCall>>,
}

impl FakeWriter {
    /// Simulate a concurrent edit that moved the item to a new version.
    pub fn changed_remotely(mut self, key: &str) -> Self {
        self.versions.insert(key.to_string(), format!("etag-{key}-v2"));
        self
    }

    pub fn respond(mut self, key: &str, status: u16) -> Self {
        self.forced.insert(key.to_string(), status);
        self
    }

    pub fn transport_error(mut self, key: &str) -> Self {
        self.broken.insert(key.to_string());
        self
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordWriter for FakeWriter {
    async fn update_record(
        &self,
        _scope: &LibraryScope,
        key: &str,
        if_match: &ConcurrencyToken,
        body: &Value,
    ) -> Result<u16> {
        self.writes.lock().unwrap().push(WriteCall {
            key: key.to_string(),
            if_match: if_match.to_string(),
            body: body.clone(),
        });
        if self.broken.contains(key) {
            return Err(SyncError::InvalidInput(format!("connection reset writing {key}")));
        }
        if let Some(status) = self.forced.get(key) {
            return Ok(*status);
        }
        let current = self
            .versions
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("etag-{key}"));
        Ok(if current == if_match.as_str() { 204 } else { 412 })
    }
}
