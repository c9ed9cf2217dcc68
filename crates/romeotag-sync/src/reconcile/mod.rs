//! Zotero × RoMEO reconciliation: fetch, resolve, decide, annotate.

pub mod collection;
pub mod decision;
pub mod outcome;
pub mod paginator;
pub mod pipeline;
pub mod resolver;
pub mod writer;

#[cfg(test)]
pub(crate) mod fakes;

pub use collection::scoped_query;
pub use decision::{Decision, decide};
pub use outcome::{Outcome, OutcomeCounts, RecordOutcome};
pub use paginator::fetch_candidates;
pub use pipeline::{Reconciler, RunOptions, RunReport};
pub use resolver::{PolicyResolver, Resolution, RunCache};
pub use writer::AnnotationWriter;
