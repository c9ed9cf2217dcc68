use chrono::{DateTime, Utc};
use serde::Serialize;

use romeotag_core::Record;

use crate::error::Result;
use crate::reconcile::decision::{Decision, decide};
use crate::reconcile::outcome::{Outcome, OutcomeCounts, RecordOutcome};
use crate::reconcile::paginator::fetch_candidates;
use crate::reconcile::resolver::PolicyResolver;
use crate::reconcile::writer::AnnotationWriter;
use crate::source::{ItemQuery, PolicyRegistry, RecordSource, RecordWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub page_size: u32,
    pub iterate: bool,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            page_size: romeotag_core::config::DEFAULT_PAGE_SIZE,
            iterate: false,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub records: usize,
    pub counts: OutcomeCounts,
    pub registry_queries: u32,
    pub distinct_journals: usize,
}

/// Drives one reconciliation run over a Zotero library.
pub struct Reconciler<'a> {
    source: &'a dyn RecordSource,
    writer: &'a dyn RecordWriter,
    registry: &'a dyn PolicyRegistry,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        source: &'a dyn RecordSource,
        writer: &'a dyn RecordWriter,
        registry: &'a dyn PolicyRegistry,
    ) -> Self {
        Self {
            source,
            writer,
            registry,
        }
    }

    /// Fetch every candidate first, then handle records one at a time.
    ///
    /// Only a failed fetch aborts the run; every per-record problem becomes an
    /// [`Outcome`] passed to `on_outcome`.
    pub async fn run<F>(&self, query: &ItemQuery, options: &RunOptions, mut on_outcome: F) -> Result<RunReport>
    where
        F: FnMut(&RecordOutcome),
    {
        let started_at = Utc::now();
        let records =
            fetch_candidates(self.source, query, options.page_size, options.iterate).await?;
        tracing::info!(records = records.len(), library = %query.scope.path(), "candidates fetched");

        let mut resolver = PolicyResolver::new(self.registry);
        let annotator = AnnotationWriter::new(self.writer, &query.scope, options.dry_run);
        let mut counts = OutcomeCounts::default();
        let total = records.len();

        for mut record in records {
            let outcome = process_record(&mut record, &mut resolver, &annotator).await;
            counts.record(&outcome);
            on_outcome(&RecordOutcome {
                key: record.key.clone(),
                title: record.display_title().to_string(),
                outcome,
            });
        }

        Ok(RunReport {
            started_at,
            records: total,
            counts,
            registry_queries: resolver.queries(),
            distinct_journals: resolver.cache().len(),
        })
    }
}

async fn process_record(
    record: &mut Record,
    resolver: &mut PolicyResolver<'_>,
    annotator: &AnnotationWriter<'_>,
) -> Outcome {
    let Some(identity) = record.identity_key() else {
        return Outcome::NoIdentity;
    };

    let resolution = match resolver
        .resolve(&identity, record.issn.as_deref(), record.title.as_deref())
        .await
    {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::warn!(key = %record.key, %identity, error = %e, "policy lookup failed");
            return Outcome::LookupFailed {
                reason: e.to_string(),
            };
        }
    };

    match decide(resolution.lookup()) {
        Decision::Single(publisher) => annotator.apply_and_write(record, publisher).await,
        Decision::NoDecision { candidates } => Outcome::NoSinglePublisher { candidates },
    }
}
