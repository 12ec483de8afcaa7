//! Gateway contract as seen from the board.

use ordr_config::ClientConfig;
use ordr_schemas::{ErrorBody, NewOrder, Order};
use reqwest::Response;
use thiserror::Error;
use tracing::debug;

/// Shown when a list request fails without a readable error envelope.
pub const LIST_FALLBACK: &str = "Orders not found";
/// Shown when a create request fails without a readable error envelope.
pub const CREATE_FALLBACK: &str = "Failed to add order";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never got a response (refused, DNS, TLS, reset).
    #[error("{0}")]
    Transport(String),
    /// Non-success status. `message` is the gateway's `error` field, or a
    /// fixed fallback when the body was not an error envelope.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// List answered with a success status but the body is not a list of orders.
    #[error("{0}")]
    Decode(String),
}

#[async_trait::async_trait]
pub trait OrdersApi: Send + Sync {
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// Any success status means the order was stored. The echoed row is
    /// `None` when the body is not a readable order.
    async fn create_order(&self, order: &NewOrder) -> Result<Option<Order>, ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpOrdersApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpOrdersApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_base_url(config.api_url.clone())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }
}

#[async_trait::async_trait]
impl OrdersApi for HttpOrdersApi {
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let resp = self
            .http
            .get(self.orders_url())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let resp = ensure_success(resp, LIST_FALLBACK).await?;
        let orders: Vec<Order> = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(count = orders.len(), "orders listed");
        Ok(orders)
    }

    async fn create_order(&self, order: &NewOrder) -> Result<Option<Order>, ApiError> {
        let resp = self
            .http
            .post(self.orders_url())
            .json(order)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let resp = ensure_success(resp, CREATE_FALLBACK).await?;
        match resp.json::<Order>().await {
            Ok(created) => {
                debug!(id = %created.id, "order created");
                Ok(Some(created))
            }
            Err(e) => {
                debug!(error = %e, "order created; echoed row unreadable");
                Ok(None)
            }
        }
    }
}

async fn ensure_success(resp: Response, fallback: &str) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    // A body that cannot even be read still yields the fallback message.
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body, fallback),
    })
}

/// The envelope's `error` field when the body is `{"error": "..."}` with a
/// non-empty message; `fallback` for anything else (HTML, plain text, empty).
pub fn error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(env) if !env.error.trim().is_empty() => env.error,
        _ => fallback.to_string(),
    }
}
