use quick_xml::de::from_str;
use serde::Deserialize;

use romeotag_core::{PolicyLookup, Publisher};

use crate::error::{Result, SyncError};

#[derive(Debug, Deserialize)]
struct RomeoApi {
    header: Option<RomeoHeader>,
    #[serde(default)]
    publishers: Option<RomeoPublishers>,
}

#[derive(Debug, Deserialize)]
struct RomeoHeader {
    numhits: Option<String>,
    outcome: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RomeoPublishers {
    #[serde(rename = "publisher", default)]
    items: Vec<RomeoPublisher>,
}

#[derive(Debug, Deserialize)]
struct RomeoPublisher {
    name: Option<String>,
    preprints: Option<Preprints>,
    postprints: Option<Postprints>,
    pdfversion: Option<PdfVersion>,
    romeocolour: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Preprints {
    prearchiving: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Postprints {
    postarchiving: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PdfVersion {
    pdfarchiving: Option<String>,
}

/// Parse a RoMEO API 2.9 response for the query value `source_key`.
pub fn parse_romeo_response(xml: &str, source_key: &str) -> Result<PolicyLookup> {
    let api: RomeoApi =
        from_str(xml).map_err(|e| SyncError::Parse(format!("invalid romeo xml: {e}")))?;

    if let Some(header) = &api.header
        && header.outcome.as_deref() == Some("failed")
    {
        let message = header.message.clone().unwrap_or_default();
        return Err(SyncError::Parse(format!("romeo query failed: {message}")));
    }

    let publishers: Vec<Publisher> = api
        .publishers
        .unwrap_or_default()
        .items
        .into_iter()
        .map(into_publisher)
        .collect();

    let hits = api
        .header
        .and_then(|h| h.numhits)
        .and_then(|n| n.trim().parse::<u32>().ok())
        .unwrap_or(publishers.len() as u32);

    Ok(PolicyLookup {
        source_key: source_key.to_string(),
        publishers,
        hits,
    })
}

fn into_publisher(raw: RomeoPublisher) -> Publisher {
    Publisher {
        name: clean_optional(raw.name),
        pre_archiving: clean_policy(raw.preprints.and_then(|p| p.prearchiving)),
        post_archiving: clean_policy(raw.postprints.and_then(|p| p.postarchiving)),
        pdf_archiving: clean_policy(raw.pdfversion.and_then(|p| p.pdfarchiving)),
        romeo_colour: clean_optional(raw.romeocolour),
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn clean_policy(value: Option<String>) -> String {
    clean_optional(value).unwrap_or_else(|| "unknown".to_string())
}
