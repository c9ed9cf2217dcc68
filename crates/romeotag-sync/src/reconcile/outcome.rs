use std::fmt;

use serde::Serialize;

/// What happened to one record during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Neither ISSN nor journal title present.
    NoIdentity,
    NoSinglePublisher { candidates: usize },
    LookupFailed { reason: String },
    AlreadyAnnotated,
    /// Write accepted with 204.
    Updated { status: u16 },
    /// Write accepted with 200: the item was already in that state.
    NothingToDo { status: u16 },
    WouldUpdate { extra: String },
    WriteRejected { status: u16 },
    WriteFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    pub key: String,
    pub title: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, title) = (&self.key, &self.title);
        match &self.outcome {
            Outcome::NoIdentity => write!(f, "No ISSN or publicationTitle for {key} {title}"),
            Outcome::NoSinglePublisher { candidates } => write!(
                f,
                "Couldn't find single publisher for {key} {title} ({candidates} candidates)"
            ),
            Outcome::LookupFailed { reason } => {
                write!(f, "Policy lookup failed for {key} {title}: {reason}")
            }
            Outcome::AlreadyAnnotated => write!(f, "Already annotated {key} {title}"),
            Outcome::Updated { status } => {
                write!(f, "Performed an update ({status}) for {key} {title}")
            }
            Outcome::NothingToDo { .. } => write!(f, "Nothing to do for {key}"),
            Outcome::WouldUpdate { extra } => write!(f, "Would update {key} {title}: {extra}"),
            Outcome::WriteRejected { status } => {
                write!(f, "Update rejected ({status}) for {key} {title}")
            }
            Outcome::WriteFailed { reason } => {
                write!(f, "Update failed for {key} {title}: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub no_identity: usize,
    pub no_single_publisher: usize,
    pub lookup_failed: usize,
    pub already_annotated: usize,
    pub updated: usize,
    pub nothing_to_do: usize,
    pub would_update: usize,
    pub write_rejected: usize,
    pub write_failed: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &Outcome) {
        let slot = match outcome {
            Outcome::NoIdentity => &mut self.no_identity,
            Outcome::NoSinglePublisher { .. } => &mut self.no_single_publisher,
            Outcome::LookupFailed { .. } => &mut self.lookup_failed,
            Outcome::AlreadyAnnotated => &mut self.already_annotated,
            Outcome::Updated { .. } => &mut self.updated,
            Outcome::NothingToDo { .. } => &mut self.nothing_to_do,
            Outcome::WouldUpdate { .. } => &mut self.would_update,
            Outcome::WriteRejected { .. } => &mut self.write_rejected,
            Outcome::WriteFailed { .. } => &mut self.write_failed,
        };
        *slot += 1;
    }

    /// Records whose write did not go through.
    pub fn failures(&self) -> usize {
        self.lookup_failed + self.write_rejected + self.write_failed
    }
}
