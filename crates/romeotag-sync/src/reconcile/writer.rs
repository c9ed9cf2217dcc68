use romeotag_core::annotation;
use romeotag_core::{LibraryScope, Publisher, Record};

use crate::reconcile::outcome::Outcome;
use crate::source::RecordWriter;

const STATUS_NO_CONTENT: u16 = 204;
const STATUS_OK: u16 = 200;

/// Applies the policy tag to a record and writes it back conditionally.
pub struct AnnotationWriter<'a> {
    writer: &'a dyn RecordWriter,
    scope: &'a LibraryScope,
    dry_run: bool,
}

impl<'a> AnnotationWriter<'a> {
    pub fn new(writer: &'a dyn RecordWriter, scope: &'a LibraryScope, dry_run: bool) -> Self {
        Self {
            writer,
            scope,
            dry_run,
        }
    }

    /// Already-tagged records are left alone and never written.
    pub async fn apply_and_write(&self, record: &mut Record, publisher: &Publisher) -> Outcome {
        let Some(extra) = annotation::annotate(record.extra(), publisher) else {
            return Outcome::AlreadyAnnotated;
        };
        record.set_extra(extra);

        if self.dry_run {
            return Outcome::WouldUpdate {
                extra: record.extra().to_string(),
            };
        }

        let result = self
            .writer
            .update_record(self.scope, &record.key, &record.etag, record.payload())
            .await;

        match result {
            Ok(STATUS_NO_CONTENT) => {
                tracing::info!(
                    key = %record.key,
                    publisher = publisher.name.as_deref().unwrap_or_default(),
                    colour = publisher.romeo_colour.as_deref().unwrap_or_default(),
                    "annotation written"
                );
                Outcome::Updated { status: STATUS_NO_CONTENT }
            }
            Ok(STATUS_OK) => Outcome::NothingToDo { status: STATUS_OK },
            Ok(status) => {
                tracing::warn!(key = %record.key, status, etag = %record.etag, "write rejected");
                Outcome::WriteRejected { status }
            }
            Err(e) => {
                tracing::warn!(key = %record.key, error = %e, "write failed");
                Outcome::WriteFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
