use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Url;
use reqwest::header::{HeaderMap, IF_MATCH, HeaderValue};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::sleep;

use romeotag_core::ConcurrencyToken;

use crate::error::{Result, SyncError};

// ─── PacedClient ──────────────────────────────────────────────────────────────

/// reqwest client that keeps a minimum interval between consecutive requests.
///
/// Failures are surfaced as-is; nothing is retried.
pub struct PacedClient {
    client: reqwest::Client,
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl PacedClient {
    pub fn new(min_interval: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    async fn wait_for_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// GET `url` and return the body; any non-2xx status is an error.
    pub async fn get(&self, url: &Url) -> Result<String> {
        self.wait_for_turn().await;
        tracing::debug!(endpoint = %redact(url), "GET");

        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Api {
                endpoint: redact(url),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.text().await?)
    }

    /// PUT a JSON body guarded by `If-Match`, returning the raw status code.
    ///
    /// Status interpretation is left to the caller.
    pub async fn put_json_if_match<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        if_match: &ConcurrencyToken,
        body: &B,
    ) -> Result<u16> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(if_match.as_str())
            .map_err(|e| SyncError::InvalidInput(format!("invalid etag {if_match}: {e}")))?;
        headers.insert(IF_MATCH, value);

        self.wait_for_turn().await;
        tracing::debug!(endpoint = %redact(url), etag = %if_match, "PUT");

        let resp = self
            .client
            .put(url.clone())
            .headers(headers)
            .json(body)
            .send()
            .await?;
        Ok(resp.status().as_u16())
    }
}

/// Strip the query string so API keys never reach logs or error messages.
pub fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

/// Join path segments onto a base URL, escaping each segment.
pub fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| SyncError::InvalidInput(format!("invalid URL {base_url}: {e}")))?;
    {
        let mut segs = url
            .path_segments_mut()
            .map_err(|_| SyncError::InvalidInput(format!("URL cannot be a base: {base_url}")))?;
        segs.pop_if_empty();
        for segment in segments {
            segs.push(segment);
        }
    }
    Ok(url)
}
