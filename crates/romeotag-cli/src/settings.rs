use std::time::Duration;

use anyhow::{Result, bail};

use romeotag_core::config::MAX_PAGE_SIZE;
use romeotag_core::{AppConfig, LibraryScope, ScopeKind};
use romeotag_sync::RunOptions;

/// Everything a run needs, after CLI flags, environment and config are merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub scope: LibraryScope,
    pub zotero_key: String,
    pub romeo_key: Option<String>,
    pub collection: Option<String>,
    pub options: RunOptions,
    pub zotero_url: String,
    pub romeo_url: String,
    pub min_interval: Duration,
    pub user_agent: String,
}

/// Values supplied on the command line (clap already folded in env vars).
#[derive(Debug, Clone, Default)]
pub struct CliValues {
    pub library_id: Option<String>,
    pub zotero_key: Option<String>,
    pub romeo_key: Option<String>,
    pub scope: Option<ScopeKind>,
    pub limit: Option<u32>,
    pub collection: Option<String>,
    pub iterate: bool,
    pub dry_run: bool,
}

impl RunSettings {
    pub fn merge(cli: CliValues, config: &AppConfig) -> Result<Self> {
        let Some(library_id) = non_empty(cli.library_id) else {
            bail!("missing Zotero library id (--library-id or ZOTERO_LIBRARY_ID)");
        };
        let Some(zotero_key) = non_empty(cli.zotero_key).or_else(|| non_empty(config.zotero.api_key.clone()))
        else {
            bail!("missing Zotero API key (--zotero-key, ZOTERO_API_KEY or [zotero].api_key)");
        };
        let romeo_key = non_empty(cli.romeo_key).or_else(|| non_empty(config.romeo.api_key.clone()));

        let page_size = cli.limit.unwrap_or(config.zotero.page_size);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            bail!("--limit must be between 1 and {MAX_PAGE_SIZE}, got {page_size}");
        }

        Ok(Self {
            scope: LibraryScope::new(cli.scope.unwrap_or(config.zotero.default_scope), library_id),
            zotero_key,
            romeo_key,
            collection: non_empty(cli.collection),
            options: RunOptions {
                page_size,
                iterate: cli.iterate,
                dry_run: cli.dry_run,
            },
            zotero_url: config.zotero.base_url.clone(),
            romeo_url: config.romeo.base_url.clone(),
            min_interval: Duration::from_millis(config.http.min_interval_ms),
            user_agent: config.http.user_agent.clone(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
