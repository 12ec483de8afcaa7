//! In-process record store.
//!
//! Behaves like a schemaless table with an integer identity column: ids
//! start at 1 and increase per collection, rows are returned in insertion
//! order. Submitted values are stored as given; an absent order column is
//! stored as `null`. Seeded rows are kept exactly as passed in.

use std::collections::HashMap;

use ordr_schemas::{NewOrder, Row};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{RecordStore, StoreError};

#[derive(Debug, Default)]
struct Collection {
    last_id: i64,
    rows: Vec<Row>,
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `collection` with existing rows. Later inserts get ids
    /// above the largest integer id seeded.
    pub fn with_rows(collection: &str, rows: Vec<Row>) -> Self {
        let last_id = rows
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);

        let mut map = HashMap::new();
        map.insert(collection.to_string(), Collection { last_id, rows });
        Self {
            collections: RwLock::new(map),
        }
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.rows.len())
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn select_all(&self, collection: &str) -> Result<Vec<Row>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .map(|c| c.rows.clone())
            .unwrap_or_default())
    }

    async fn insert_returning(
        &self,
        collection: &str,
        row: &NewOrder,
    ) -> Result<Vec<Row>, StoreError> {
        let mut guard = self.collections.write().await;
        let table = guard.entry(collection.to_string()).or_default();

        table.last_id += 1;
        let mut stored = Row::new();
        stored.insert("id".to_string(), Value::from(table.last_id));
        for (column, value) in [
            ("order_number", &row.order_number),
            ("product", &row.product),
            ("quantity", &row.quantity),
            ("due_date", &row.due_date),
        ] {
            stored.insert(column.to_string(), value.clone().unwrap_or(Value::Null));
        }
        table.rows.push(stored.clone());

        Ok(vec![stored])
    }
}
