use std::time::Duration;

use async_trait::async_trait;

use romeotag_core::PolicyLookup;

use crate::error::{Result, SyncError};
use crate::http::PacedClient;
use crate::romeo::parser::parse_romeo_response;
use crate::source::{PolicyRegistry, RegistryQuery};

/// SHERPA/RoMEO publisher policy API.
pub struct RomeoClient {
    client: PacedClient,
    api_key: Option<String>,
    base_url: String,
}

impl RomeoClient {
    pub fn with_params(
        base_url: &str,
        min_interval: Duration,
        user_agent: &str,
        api_key: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: PacedClient::new(min_interval, user_agent)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.to_string(),
        })
    }

    fn query_url(&self, query: RegistryQuery<'_>) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SyncError::InvalidInput(format!("invalid URL {}: {e}", self.base_url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                RegistryQuery::Issn(issn) => {
                    pairs.append_pair("issn", issn);
                }
                RegistryQuery::Title(title) => {
                    pairs.append_pair("jtitle", title).append_pair("qtype", "exact");
                }
            }
            if let Some(key) = &self.api_key {
                pairs.append_pair("ak", key);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl PolicyRegistry for RomeoClient {
    async fn lookup(&self, query: RegistryQuery<'_>) -> Result<PolicyLookup> {
        let url = self.query_url(query)?;
        let xml = self.client.get(&url).await?;
        let lookup = parse_romeo_response(&xml, query.value())?;
        tracing::debug!(%query, hits = lookup.hits, publishers = lookup.publishers.len(), "romeo lookup");
        Ok(lookup)
    }
}
