//! ordr-store
//!
//! The external record store boundary. The gateway talks to storage only
//! through [`RecordStore`]; schema, consistency and id assignment belong to
//! the backend.
//!
//! Backends:
//! - [`RestRecordStore`]: hosted PostgREST-style service over HTTPS.
//! - [`PgRecordStore`]: direct Postgres connection.
//! - [`MemoryRecordStore`]: in-process, for tests and local demos.

pub mod memory;
pub mod postgres;
pub mod rest;

use std::sync::Arc;

use ordr_config::StoreSecrets;
use ordr_schemas::{NewOrder, Row};
use thiserror::Error;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;
pub use rest::RestRecordStore;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failures reported by a record store.
///
/// `Display` is the bare message: the gateway relays it to clients as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Network, TLS or pool failure; the store was never reached.
    #[error("{0}")]
    Transport(String),
    /// The store answered with an error (bad key, unknown column, constraint...).
    #[error("{message}")]
    Api { status: Option<u16>, message: String },
    /// The store answered, but the payload was not a list of rows.
    #[error("{0}")]
    Decode(String),
    /// The store could not be constructed from the given settings.
    #[error("{0}")]
    Config(String),
}

impl StoreError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "transport",
            StoreError::Api { .. } => "api",
            StoreError::Decode(_) => "decode",
            StoreError::Config(_) => "config",
        }
    }
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// `select all` and `insert-returning` over a named collection.
///
/// Rows are untyped: whatever columns and value types the store holds come
/// back unchanged.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Every row of `collection`, unfiltered, in the store's own order.
    async fn select_all(&self, collection: &str) -> Result<Vec<Row>, StoreError>;

    /// Insert one row and return what the store reports as inserted.
    /// An empty vector is a valid store answer; callers decide what it means.
    async fn insert_returning(
        &self,
        collection: &str,
        row: &NewOrder,
    ) -> Result<Vec<Row>, StoreError>;
}

/// Build the backend selected by the URL scheme of `secrets.url`.
///
/// | scheme                     | backend               |
/// |----------------------------|-----------------------|
/// | `http://`, `https://`      | [`RestRecordStore`]   |
/// | `postgres://`, `postgresql://` | [`PgRecordStore`] |
/// | `memory:`                  | [`MemoryRecordStore`] |
pub async fn connect(secrets: &StoreSecrets) -> Result<Arc<dyn RecordStore>, StoreError> {
    let url = secrets.url.trim();

    if url.starts_with("memory:") {
        return Ok(Arc::new(MemoryRecordStore::new()));
    }

    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        let store = PgRecordStore::connect(url).await?;
        return Ok(Arc::new(store));
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        let Some(key) = secrets.key.as_deref() else {
            return Err(StoreError::Config(
                "hosted REST store requires a service key (ORDR_STORE_KEY)".to_string(),
            ));
        };
        return Ok(Arc::new(RestRecordStore::new(url, key)));
    }

    Err(StoreError::Config(format!(
        "unsupported store url scheme: expected https://, postgres:// or memory: (got '{}')",
        url.split(':').next().unwrap_or_default()
    )))
}
