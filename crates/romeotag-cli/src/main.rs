mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use romeotag_core::config::MAX_PAGE_SIZE;
use romeotag_core::{AppConfig, ExitCode, ScopeKind};
use romeotag_sync::{
    Reconciler, RecordOutcome, RomeoClient, RunReport, SyncError, ZoteroClient, scoped_query,
};

use crate::settings::{CliValues, RunSettings};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "romeotag",
    about = "Tag Zotero journal articles with their SHERPA/RoMEO archiving policy",
    version,
    long_about = None
)]
struct Cli {
    /// Zotero user or group id.
    #[arg(long, env = "ZOTERO_LIBRARY_ID")]
    library_id: Option<String>,

    #[arg(long, env = "ZOTERO_API_KEY", hide_env_values = true)]
    zotero_key: Option<String>,

    #[arg(long, env = "ROMEO_API_KEY", hide_env_values = true)]
    romeo_key: Option<String>,

    /// `user` or `group` (default from config, else `user`).
    #[arg(long)]
    scope: Option<ScopeKind>,

    /// Page size (at most 100); without --iterate only the most recent N items are checked.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
    limit: Option<u32>,

    /// Restrict the run to the collection with this name.
    #[arg(long)]
    collection: Option<String>,

    /// Keep fetching pages until the library is exhausted.
    #[arg(long)]
    iterate: bool,

    /// Compute tags but do not write anything back.
    #[arg(long)]
    dry_run: bool,

    /// One JSON object per record, plus a summary object.
    #[arg(long)]
    json: bool,

    #[arg(long, env = "ROMEOTAG_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    fn values(&self) -> CliValues {
        CliValues {
            library_id: self.library_id.clone(),
            zotero_key: self.zotero_key.clone(),
            romeo_key: self.romeo_key.clone(),
            scope: self.scope,
            limit: self.limit,
            collection: self.collection.clone(),
            iterate: self.iterate,
            dry_run: self.dry_run,
        }
    }
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("romeotag=info,romeotag_sync=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("failed to load config")?;

    let settings = match RunSettings::merge(cli.values(), &config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run `romeotag --help` for usage.");
            std::process::exit(ExitCode::InvalidArgs.code());
        }
    };

    match run(&settings, cli.json).await {
        Ok(report) => {
            print_summary(&report, cli.json)?;
            Ok(())
        }
        Err(e) => {
            eprintln!("{e:#}");
            let code = e
                .downcast_ref::<SyncError>()
                .map_or(ExitCode::GeneralError, SyncError::exit_code);
            std::process::exit(code.code());
        }
    }
}

async fn run(settings: &RunSettings, json_output: bool) -> Result<RunReport> {
    let zotero = ZoteroClient::with_params(
        &settings.zotero_url,
        settings.min_interval,
        &settings.user_agent,
        settings.zotero_key.clone(),
    )?;
    if settings.romeo_key.is_none() {
        tracing::warn!("no RoMEO API key configured, requests are rate limited by SHERPA");
    }
    let romeo = RomeoClient::with_params(
        &settings.romeo_url,
        settings.min_interval,
        &settings.user_agent,
        settings.romeo_key.clone(),
    )?;

    let query = scoped_query(&zotero, &settings.scope, settings.collection.as_deref()).await?;

    let reconciler = Reconciler::new(&zotero, &zotero, &romeo);
    let report = reconciler
        .run(&query, &settings.options, |outcome| print_outcome(outcome, json_output))
        .await?;
    Ok(report)
}

fn print_outcome(outcome: &RecordOutcome, json_output: bool) {
    if json_output {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, key = %outcome.key, "failed to encode outcome"),
        }
    } else {
        println!("{outcome}");
    }
}

fn print_summary(report: &RunReport, json_output: bool) -> Result<()> {
    if json_output {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({ "status": "ok", "summary": report }))?
        );
        return Ok(());
    }

    let c = &report.counts;
    eprintln!(
        "{} records: {} updated, {} unchanged, {} already tagged, {} without single publisher, {} without ISSN/title, {} failed ({} registry queries, {} journals)",
        report.records,
        c.updated + c.would_update,
        c.nothing_to_do,
        c.already_annotated,
        c.no_single_publisher,
        c.no_identity,
        c.failures(),
        report.registry_queries,
        report.distinct_journals,
    );
    Ok(())
}
