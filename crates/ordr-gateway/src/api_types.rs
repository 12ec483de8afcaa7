//! Error responses for the gateway's HTTP surface.
//!
//! Every failure leaves the gateway as `{"error": "<message>"}`, so clients
//! never need to branch on content type.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ordr_schemas::ErrorBody;
use ordr_store::StoreError;

/// Message returned when the store accepts an insert but hands back no row.
pub const NO_DATA_AFTER_INSERT: &str = "No data returned after insert";

#[derive(Debug)]
pub enum GatewayError {
    /// Any store failure; relayed opaquely as 500 with the store's message.
    Store(StoreError),
    /// Store reported success for an insert but returned zero rows.
    NoDataAfterInsert,
    /// Request body could not be read as a JSON object.
    BadBody { status: StatusCode, message: String },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Store(_) | GatewayError::NoDataAfterInsert => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::BadBody { status, .. } => *status,
        }
    }

    pub fn message(&self) -> String {
        match self {
            GatewayError::Store(e) => e.message(),
            GatewayError::NoDataAfterInsert => NO_DATA_AFTER_INSERT.to_string(),
            GatewayError::BadBody { message, .. } => message.clone(),
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        GatewayError::Store(e)
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::BadBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.message()))).into_response()
    }
}
