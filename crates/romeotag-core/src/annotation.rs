//! The `#SherpaRomeo` tag written into a record's `extra` field.

use crate::models::Publisher;

/// Substring whose presence means a record is already annotated.
pub const MARKER: &str = "SherpaRomeo";

pub fn is_annotated(extra: &str) -> bool {
    extra.contains(MARKER)
}

pub fn format_tag(publisher: &Publisher) -> String {
    format!(
        "#{MARKER} Pre {}; #{MARKER} Post {}; #{MARKER} PDF {}; ",
        publisher.pre_archiving, publisher.post_archiving, publisher.pdf_archiving
    )
}

/// Prepend the policy tag to `extra`, or `None` if it already carries one.
pub fn annotate(extra: &str, publisher: &Publisher) -> Option<String> {
    if is_annotated(extra) {
        return None;
    }
    Some(format!("{}{extra}", format_tag(publisher)))
}
