//! Hosted PostgREST-style record store.
//!
//! `GET  {base}/rest/v1/{collection}?select=*`
//! `POST {base}/rest/v1/{collection}?select=*` with `Prefer: return=representation`
//!
//! The service key is sent both as `apikey` and as a bearer token. Do not log it.

use ordr_schemas::{NewOrder, Row};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::{RecordStore, StoreError};

#[derive(Clone)]
pub struct RestRecordStore {
    http: reqwest::Client,
    base_url: String,
    key: String,
}

impl std::fmt::Debug for RestRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestRecordStore")
            .field("base_url", &self.base_url)
            .field("key", &"<REDACTED>")
            .finish()
    }
}

impl RestRecordStore {
    pub fn new(base_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, key)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.into(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.key).bearer_auth(&self.key)
    }
}

#[async_trait::async_trait]
impl RecordStore for RestRecordStore {
    fn backend_name(&self) -> &'static str {
        "rest"
    }

    async fn select_all(&self, collection: &str) -> Result<Vec<Row>, StoreError> {
        let resp = self
            .authed(self.http.get(self.collection_url(collection)))
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let rows = read_rows(resp).await?;
        debug!(collection, rows = rows.len(), "rest select_all");
        Ok(rows)
    }

    async fn insert_returning(
        &self,
        collection: &str,
        row: &NewOrder,
    ) -> Result<Vec<Row>, StoreError> {
        let resp = self
            .authed(self.http.post(self.collection_url(collection)))
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let rows = read_rows(resp).await?;
        debug!(collection, rows = rows.len(), "rest insert_returning");
        Ok(rows)
    }
}

async fn read_rows(resp: Response) -> Result<Vec<Row>, StoreError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(StoreError::Api {
            status: Some(status.as_u16()),
            message: api_error_message(status, &text),
        });
    }

    // `return=minimal` or an empty 201 means "no rows", not a decode failure.
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str::<Vec<Row>>(&text)
        .map_err(|e| StoreError::Decode(format!("store response is not a list of rows: {e}")))
}

/// Human message from a PostgREST / gateway error body.
///
/// PostgREST sends `{"message", "code", "details", "hint"}`; the auth layer in
/// front of it sends `{"error", "error_description"}` or `{"msg"}`.
fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error_description", "error", "msg"] {
            if let Some(Value::String(s)) = map.get(field) {
                if !s.trim().is_empty() {
                    return s.clone();
                }
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}
