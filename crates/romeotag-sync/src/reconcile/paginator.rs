use romeotag_core::Record;
use romeotag_core::config::MAX_PAGE_SIZE;

use crate::error::{Result, SyncError};
use crate::source::{ItemQuery, RecordSource};

/// Collect candidate records, one page or until a short page.
///
/// Any failed page aborts the whole fetch; nothing accumulated is returned.
/// Page sizes above what Zotero serves are rejected, since a capped page
/// would look like the last one.
pub async fn fetch_candidates(
    source: &dyn RecordSource,
    query: &ItemQuery,
    page_size: u32,
    iterate: bool,
) -> Result<Vec<Record>> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(SyncError::InvalidInput(format!(
            "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }

    if !iterate {
        return source.fetch_page(query, 0, page_size).await;
    }

    let mut records = Vec::new();
    let mut start = 0u32;
    loop {
        let page = source.fetch_page(query, start, page_size).await?;
        let received = page.len();
        records.extend(page);

        if received < page_size as usize {
            break;
        }
        start += page_size;
    }

    tracing::debug!(total = records.len(), "pagination finished");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::fakes::{FakeSource, query};

    #[tokio::test]
    async fn single_page_when_not_iterating() {
        let source = FakeSource::with_total(60);
        let records = fetch_candidates(&source, &query(), 25, false).await.unwrap();

        assert_eq!(records.len(), 25);
        assert_eq!(source.calls(), vec![(0, 25)]);
    }

    #[tokio::test]
    async fn iterates_until_short_page() {
        // 3 full pages followed by a page of 7.
        let source = FakeSource::with_total(3 * 25 + 7);
        let records = fetch_candidates(&source, &query(), 25, true).await.unwrap();

        assert_eq!(records.len(), 82);
        assert_eq!(source.calls(), vec![(0, 25), (25, 25), (50, 25), (75, 25)]);
        assert_eq!(records[0].key, "ITEM0000");
        assert_eq!(records[81].key, "ITEM0081");
    }

    #[tokio::test]
    async fn terminates_on_empty_final_page() {
        let source = FakeSource::with_total(50);
        let records = fetch_candidates(&source, &query(), 25, true).await.unwrap();

        assert_eq!(records.len(), 50);
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test]
    async fn failed_page_discards_everything() {
        let source = FakeSource::with_total(100).failing_at(50);
        let err = fetch_candidates(&source, &query(), 25, true).await.unwrap_err();

        assert!(err.is_network());
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let source = FakeSource::with_total(10);
        let err = fetch_candidates(&source, &query(), 0, true).await.unwrap_err();

        assert!(matches!(err, SyncError::InvalidInput(_)));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn page_size_above_server_cap_is_rejected() {
        let source = FakeSource::with_total(250).capped_at(MAX_PAGE_SIZE);
        let err = fetch_candidates(&source, &query(), 150, true).await.unwrap_err();

        assert!(matches!(err, SyncError::InvalidInput(_)));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn full_pages_at_server_cap_reach_the_end() {
        let source = FakeSource::with_total(250).capped_at(MAX_PAGE_SIZE);
        let records = fetch_candidates(&source, &query(), MAX_PAGE_SIZE, true).await.unwrap();

        assert_eq!(records.len(), 250);
        assert_eq!(source.calls(), vec![(0, 100), (100, 100), (200, 100)]);
    }
}
