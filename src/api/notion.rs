//! Implements the `Store` trait with `reqwest` against the Notion REST API.

use crate::api::Store;
use crate::model::{Page, Properties, Query, QueryResponse};
use crate::{Config, Result};
use anyhow::{anyhow, bail, Context};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use tracing::trace;
use url::Url;

/// The API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

const NOTION_VERSION_HEADER: HeaderName = HeaderName::from_static("notion-version");

/// A `Store` backed by the Notion REST API. The bearer credential and version header are set once
/// as default headers of the underlying client, which is reused for every request.
#[derive(Debug, Clone)]
pub struct NotionStore {
    client: reqwest::Client,
    base: Url,
}

impl NotionStore {
    /// Builds the HTTP client from the API key and base URL in `config`.
    ///
    /// # Errors
    /// - Returns an error if the API key cannot be used as a header value or the client cannot be
    ///   built.
    pub fn new(config: &Config) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .context("The Notion API key contains characters that are not valid in a header")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            NOTION_VERSION_HEADER,
            HeaderValue::from_static(NOTION_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self {
            client,
            base: config.api_base().clone(),
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("The Notion API base URL '{}' cannot be a base", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Store for NotionStore {
    async fn query(&self, database_id: &str, query: &Query) -> Result<QueryResponse> {
        let url = self.endpoint(&["databases", database_id, "query"])?;
        trace!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(query)
            .send()
            .await
            .with_context(|| format!("Failed to send query request for database {database_id}"))?;
        let response = check_status(response, "query").await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse query response for database {database_id}"))
    }

    async fn create_page(&self, database_id: &str, properties: Properties) -> Result<Page> {
        let url = self.endpoint(&["pages"])?;
        trace!("POST {url}");
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("Failed to send create page request to the Notion API")?;
        let response = check_status(response, "create page").await?;
        response
            .json()
            .await
            .context("Failed to parse the Notion API create page response")
    }
}

/// Turns a non-success status into an error carrying the status and the response body.
async fn check_status(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    bail!("Notion API {operation} failed with status {status}: {body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Filter, PageId, NAME};
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    /// A request as seen by the stand-in server.
    #[derive(Debug, Clone)]
    struct Received {
        path: String,
        authorization: Option<String>,
        version: Option<String>,
        body: Value,
    }

    #[derive(Debug, Clone, Default)]
    struct StandIn {
        received: Arc<Mutex<Vec<Received>>>,
    }

    impl StandIn {
        fn record(&self, path: String, headers: &AxumHeaders, body: Value) {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            self.received.lock().unwrap().push(Received {
                path,
                authorization: header("authorization"),
                version: header("notion-version"),
                body,
            });
        }

        fn received(&self) -> Vec<Received> {
            self.received.lock().unwrap().clone()
        }
    }

    async fn query_handler(
        State(stand_in): State<StandIn>,
        Path(database_id): Path<String>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        stand_in.record(format!("/v1/databases/{database_id}/query"), &headers, body);
        if database_id == "broken" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"object": "error", "code": "object_not_found"})),
            )
                .into_response();
        }
        Json(json!({
            "object": "list",
            "results": [{
                "object": "page",
                "id": "page-1",
                "properties": {
                    "Name": {"type": "title", "title": [{"plain_text": "März"}]}
                }
            }],
            "has_more": false,
            "next_cursor": null
        }))
        .into_response()
    }

    async fn create_handler(
        State(stand_in): State<StandIn>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        let rejected = body["parent"]["database_id"] == "rejecting";
        stand_in.record("/v1/pages".to_string(), &headers, body.clone());
        if rejected {
            return (
                StatusCode::BAD_REQUEST,
                "body failed validation: Betrag is not a property",
            )
                .into_response();
        }
        Json(json!({
            "object": "page",
            "id": "new-page",
            "properties": body["properties"].clone()
        }))
        .into_response()
    }

    /// Serves a minimal imitation of the two Notion endpoints on a random local port.
    async fn spawn_stand_in() -> (StandIn, Url) {
        let stand_in = StandIn::default();
        let router = Router::new()
            .route("/v1/databases/{database_id}/query", post(query_handler))
            .route("/v1/pages", post(create_handler))
            .with_state(stand_in.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        let base = Url::parse(&format!("http://{addr}/v1")).unwrap();
        (stand_in, base)
    }

    fn store_for(base: Url) -> NotionStore {
        let config = Config::new("secret_abc", "tx-db")
            .unwrap()
            .with_api_base(base);
        NotionStore::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_query_sends_headers_and_filter() {
        let (stand_in, base) = spawn_stand_in().await;
        let store = store_for(base);
        let query = Query::filtered(Filter::title_equals(NAME, "März")).with_page_size(1);

        let response = store.query("month-db", &query).await.unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id(), &PageId::from("page-1"));
        let received = stand_in.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].path, "/v1/databases/month-db/query");
        assert_eq!(
            received[0].authorization.as_deref(),
            Some("Bearer secret_abc")
        );
        assert_eq!(received[0].version.as_deref(), Some(NOTION_VERSION));
        assert_eq!(
            received[0].body,
            json!({
                "filter": {"property": "Name", "title": {"equals": "März"}},
                "page_size": 1
            })
        );
    }

    #[tokio::test]
    async fn test_query_error_status() {
        let (_stand_in, base) = spawn_stand_in().await;
        let store = store_for(base);

        let err = store.query("broken", &Query::all()).await.unwrap_err();

        assert!(err.to_string().contains("404"), "{err}");
    }

    #[tokio::test]
    async fn test_query_unreachable() {
        // Nothing listens on port 9 of the loopback interface.
        let store = store_for(Url::parse("http://127.0.0.1:9/v1").unwrap());
        assert!(store.query("db", &Query::all()).await.is_err());
    }

    #[tokio::test]
    async fn test_create_page() {
        let (stand_in, base) = spawn_stand_in().await;
        let store = store_for(base);
        let properties = Properties::new()
            .title(NAME, "Migros")
            .number("Betrag", Amount::new(dec!(4.5)));

        let page = store.create_page("tx-db", properties).await.unwrap();

        assert_eq!(page.id(), &PageId::from("new-page"));
        assert_eq!(page.title(NAME).as_deref(), Some("Migros"));
        let received = stand_in.received();
        assert_eq!(received[0].path, "/v1/pages");
        assert_eq!(
            received[0].body["parent"],
            json!({"database_id": "tx-db"})
        );
        assert_eq!(received[0].body["properties"]["Betrag"], json!({"number": 4.5}));
    }

    #[tokio::test]
    async fn test_create_page_rejected() {
        let (_stand_in, base) = spawn_stand_in().await;
        let store = store_for(base);

        let err = store
            .create_page("rejecting", Properties::new().title(NAME, "x"))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("400"), "{message}");
        assert!(message.contains("Betrag is not a property"), "{message}");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let store = store_for(Url::parse("https://api.notion.com/v1/").unwrap());
        let url = store.endpoint(&["databases", "abc", "query"]).unwrap();
        assert_eq!(url.as_str(), "https://api.notion.com/v1/databases/abc/query");
    }
}
