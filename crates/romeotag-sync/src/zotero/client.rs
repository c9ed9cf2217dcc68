use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use romeotag_core::{Collection, ConcurrencyToken, LibraryScope, Record};

use crate::error::Result;
use crate::http::{PacedClient, endpoint};
use crate::source::{ItemQuery, RecordSource, RecordWriter};
use crate::zotero::parser::{parse_collections, parse_items_feed};

/// Zotero web API (v2 Atom feeds with JSON content).
pub struct ZoteroClient {
    client: PacedClient,
    api_key: String,
    base_url: String,
}

impl ZoteroClient {
    pub fn with_params(
        base_url: &str,
        min_interval: Duration,
        user_agent: &str,
        api_key: String,
    ) -> Result<Self> {
        Ok(Self {
            client: PacedClient::new(min_interval, user_agent)?,
            api_key,
            base_url: base_url.to_string(),
        })
    }

    fn library_url(&self, scope: &LibraryScope, rest: &[&str]) -> Result<Url> {
        let mut segments = vec![scope.kind.path_segment(), scope.id.as_str()];
        segments.extend_from_slice(rest);
        let mut url = endpoint(&self.base_url, &segments)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn items_url(&self, query: &ItemQuery, start: u32, limit: u32) -> Result<Url> {
        let mut url = match &query.collection {
            Some(collection) => {
                self.library_url(&query.scope, &["collections", collection.as_str(), "items"])?
            }
            None => self.library_url(&query.scope, &["items"])?,
        };
        url.query_pairs_mut()
            .append_pair("itemType", "journalArticle")
            .append_pair("content", "json")
            .append_pair("limit", &limit.to_string())
            .append_pair("sort", "dateModified")
            .append_pair("start", &start.to_string());
        Ok(url)
    }
}

#[async_trait]
impl RecordSource for ZoteroClient {
    async fn fetch_page(&self, query: &ItemQuery, start: u32, limit: u32) -> Result<Vec<Record>> {
        let url = self.items_url(query, start, limit)?;
        let xml = self.client.get(&url).await?;
        let records = parse_items_feed(&xml)?;
        tracing::info!(
            library = %query.scope.path(),
            start,
            limit,
            received = records.len(),
            "fetched page of items"
        );
        Ok(records)
    }

    async fn list_collections(&self, scope: &LibraryScope) -> Result<Vec<Collection>> {
        let url = self.library_url(scope, &["collections"])?;
        let body = self.client.get(&url).await?;
        parse_collections(&body)
    }
}

#[async_trait]
impl RecordWriter for ZoteroClient {
    async fn update_record(
        &self,
        scope: &LibraryScope,
        key: &str,
        if_match: &ConcurrencyToken,
        body: &Value,
    ) -> Result<u16> {
        let url = self.library_url(scope, &["items", key])?;
        self.client.put_json_if_match(&url, if_match, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zotero::parser::tests::TWO_ITEMS_XML;
    use mockito::{Matcher, Server};
    use romeotag_core::ScopeKind;

    fn client_for(server: &Server) -> ZoteroClient {
        ZoteroClient::with_params(
            &server.url(),
            Duration::from_secs(0),
            "romeotag-test",
            "zkey".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_sends_fixed_filters() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/users/475425/items")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "zkey".into()),
                Matcher::UrlEncoded("itemType".into(), "journalArticle".into()),
                Matcher::UrlEncoded("content".into(), "json".into()),
                Matcher::UrlEncoded("limit".into(), "25".into()),
                Matcher::UrlEncoded("sort".into(), "dateModified".into()),
                Matcher::UrlEncoded("start".into(), "50".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(TWO_ITEMS_XML)
            .create_async()
            .await;

        let client = client_for(&server);
        let query = ItemQuery::new(LibraryScope::new(ScopeKind::User, "475425"));
        let records = client.fetch_page(&query, 50, 25).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "X42A7DEE");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_uses_collection_endpoint() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/groups/99/collections/AB12CD34/items")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(TWO_ITEMS_XML)
            .create_async()
            .await;

        let client = client_for(&server);
        let query =
            ItemQuery::new(LibraryScope::new(ScopeKind::Group, "99")).in_collection("AB12CD34");
        client.fetch_page(&query, 0, 10).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_collections() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/users/475425/collections")
            .match_query(Matcher::UrlEncoded("key".into(), "zkey".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"key": "AB12CD34", "data": {"key": "AB12CD34", "name": "Thesis"}}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let cols = client
            .list_collections(&LibraryScope::new(ScopeKind::User, "475425"))
            .await
            .unwrap();
        assert_eq!(cols, vec![Collection { key: "AB12CD34".into(), name: "Thesis".into() }]);
    }

    #[tokio::test]
    async fn test_update_record_returns_status() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/users/475425/items/X42A7DEE")
            .match_query(Matcher::UrlEncoded("key".into(), "zkey".into()))
            .match_header("if-match", "stale-etag")
            .with_status(412)
            .create_async()
            .await;

        let client = client_for(&server);
        let status = client
            .update_record(
                &LibraryScope::new(ScopeKind::User, "475425"),
                "X42A7DEE",
                &ConcurrencyToken::new("stale-etag"),
                &serde_json::json!({"extra": "x"}),
            )
            .await
            .unwrap();
        assert_eq!(status, 412);
        m.assert_async().await;
    }
}
