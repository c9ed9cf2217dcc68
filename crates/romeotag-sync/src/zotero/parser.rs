use quick_xml::de::from_str;
use serde::Deserialize;
use serde_json::Value;

use romeotag_core::{Collection, ConcurrencyToken, Record};

use crate::error::{Result, SyncError};

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(rename = "zapi:key", alias = "key")]
    key: Option<String>,
    content: Option<AtomContent>,
}

#[derive(Debug, Deserialize)]
struct AtomContent {
    #[serde(rename = "@zapi:etag", alias = "@etag")]
    etag: Option<String>,
    #[serde(rename = "$text", default)]
    body: String,
}

/// Parse a Zotero v2 Atom feed (`content=json`) into records.
pub fn parse_items_feed(xml: &str) -> Result<Vec<Record>> {
    let feed: AtomFeed =
        from_str(xml).map_err(|e| SyncError::Parse(format!("invalid atom xml: {e}")))?;

    feed.entries.into_iter().map(parse_entry).collect()
}

fn parse_entry(entry: AtomEntry) -> Result<Record> {
    let content = entry
        .content
        .ok_or_else(|| SyncError::Parse("feed entry without <content>".to_string()))?;

    let payload: Value = serde_json::from_str(content.body.trim())
        .map_err(|e| SyncError::Parse(format!("invalid item json: {e}")))?;

    let key = entry
        .key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| payload.get("itemKey").and_then(Value::as_str).map(ToOwned::to_owned))
        .ok_or_else(|| SyncError::Parse("feed entry without item key".to_string()))?;

    let etag = content
        .etag
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SyncError::Parse(format!("item {key} has no etag")))?;

    Ok(Record::from_payload(key, ConcurrencyToken::new(etag), payload)?)
}

#[derive(Debug, Deserialize)]
struct CollectionEntry {
    key: String,
    #[serde(default)]
    data: Option<CollectionData>,
}

#[derive(Debug, Deserialize)]
struct CollectionData {
    key: Option<String>,
    name: String,
}

/// Parse the JSON collection listing. Entries without a name are skipped.
pub fn parse_collections(json: &str) -> Result<Vec<Collection>> {
    let entries: Vec<CollectionEntry> =
        serde_json::from_str(json).map_err(|e| SyncError::Parse(format!("invalid collections json: {e}")))?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let data = entry.data?;
            Some(Collection {
                key: data.key.unwrap_or(entry.key),
                name: data.name,
            })
        })
        .collect())
}
