//! Axum router and HTTP handlers for ordr-gateway.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Tests in `tests/` drive the bare router directly.
//!
//! | Method | Path             | Store call          |
//! |--------|------------------|---------------------|
//! | GET    | `/`, `/orders`   | `select_all`        |
//! | POST   | `/orders`        | `insert_returning`  |

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ordr_schemas::{NewOrder, Row, ORDERS_COLLECTION};
use tracing::{error, info, warn};

use crate::{api_types::GatewayError, state::AppState};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_orders))
        .route("/orders", get(list_orders).post(create_order))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET / and GET /orders
// ---------------------------------------------------------------------------

/// Every order in the store, in the store's order, each row exactly as the
/// store returned it. No filter, no paging.
pub(crate) async fn list_orders(
    State(st): State<Arc<AppState>>,
) -> Result<Json<Vec<Row>>, GatewayError> {
    let orders = st
        .store
        .select_all(ORDERS_COLLECTION)
        .await
        .map_err(|e| {
            error!(backend = st.store.backend_name(), kind = e.kind(), error = %e, "select failed");
            GatewayError::Store(e)
        })?;

    Ok(Json(orders))
}

// ---------------------------------------------------------------------------
// POST /orders
// ---------------------------------------------------------------------------

/// Insert one order and return the row the store reports, unchanged.
///
/// Fields are forwarded untouched: no type checks, no required-field checks.
/// A store success with zero rows is still a 500.
pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    body: Result<Json<NewOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<Row>), GatewayError> {
    let Json(new_order) = body.map_err(|rejection| {
        warn!(status = %rejection.status(), "unreadable order body");
        GatewayError::from(rejection)
    })?;

    let mut rows = st
        .store
        .insert_returning(ORDERS_COLLECTION, &new_order)
        .await
        .map_err(|e| {
            error!(backend = st.store.backend_name(), kind = e.kind(), error = %e, "insert failed");
            GatewayError::Store(e)
        })?;

    if rows.is_empty() {
        error!(backend = st.store.backend_name(), "insert returned no rows");
        return Err(GatewayError::NoDataAfterInsert);
    }

    let created = rows.swap_remove(0);
    info!(id = %created.get("id").unwrap_or(&serde_json::Value::Null), "order created");
    Ok((StatusCode::CREATED, Json(created)))
}
