//! Direct Postgres record store.
//!
//! Rows are read back as `to_jsonb(row)`, so whatever columns the table has
//! are relayed with their own JSON types, without this crate knowing the
//! schema. Inserts go through
//! `jsonb_populate_record`, which applies the table's own column types to the
//! submitted values (text `"5"` into an integer column, and so on).
//!
//! No migrations ship with this backend; the `orders` table is owned by the
//! database.

use ordr_schemas::{NewOrder, Row};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use tracing::debug;

use crate::{RecordStore, StoreError};

/// Env var for the DB-backed tests of this module.
pub const ENV_TEST_DB_URL: &str = "ORDR_DATABASE_URL";

#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(map_sqlx)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecordStore for PgRecordStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn select_all(&self, collection: &str) -> Result<Vec<Row>, StoreError> {
        let sql = format!("select to_jsonb(t) from {} t", quote_ident(collection));
        let rows: Vec<Json<Value>> = sqlx::query_scalar(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        debug!(collection, rows = rows.len(), "pg select_all");
        rows.into_iter().map(|Json(v)| decode_row(v)).collect()
    }

    async fn insert_returning(
        &self,
        collection: &str,
        row: &NewOrder,
    ) -> Result<Vec<Row>, StoreError> {
        let (sql, binds_row) = insert_sql(collection, row);
        let query = sqlx::query_scalar(&sql);
        let query = if binds_row { query.bind(Json(row)) } else { query };
        let rows: Vec<Json<Value>> = query
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        debug!(collection, rows = rows.len(), "pg insert_returning");
        rows.into_iter().map(|Json(v)| decode_row(v)).collect()
    }
}

/// Only the columns present in the body are inserted, so absent fields fall
/// back to the column defaults instead of being forced to NULL.
///
/// Returns the statement and whether it expects the body bound as `$1`.
fn insert_sql(collection: &str, row: &NewOrder) -> (String, bool) {
    let table = quote_ident(collection);
    let columns: Vec<&str> = [
        ("order_number", row.order_number.is_some()),
        ("product", row.product.is_some()),
        ("quantity", row.quantity.is_some()),
        ("due_date", row.due_date.is_some()),
    ]
    .into_iter()
    .filter_map(|(c, present)| present.then_some(c))
    .collect();

    if columns.is_empty() {
        return (
            format!("insert into {table} as t default values returning to_jsonb(t)"),
            false,
        );
    }

    let list = columns.join(", ");
    let picked = columns
        .iter()
        .map(|c| format!("r.{c}"))
        .collect::<Vec<_>>()
        .join(", ");

    (
        format!(
            "insert into {table} as t ({list}) \
             select {picked} from jsonb_populate_record(null::{table}, $1::jsonb) r \
             returning to_jsonb(t)"
        ),
        true,
    )
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn decode_row(v: Value) -> Result<Row, StoreError> {
    match v {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::Decode(format!("row is not an object: {other}"))),
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db) => StoreError::Api {
            status: None,
            message: db.message().to_string(),
        },
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Decode(e.to_string())
        }
        sqlx::Error::Configuration(_) => StoreError::Config(e.to_string()),
        other => StoreError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_sql_lists_only_present_columns() {
        let body = NewOrder {
            product: Some(json!("Bolt")),
            due_date: Some(json!("2024-01-01")),
            ..NewOrder::default()
        };
        let (sql, binds_row) = insert_sql("orders", &body);
        assert!(binds_row);
        assert!(sql.contains("(product, due_date)"));
        assert!(sql.contains("select r.product, r.due_date"));
        assert!(sql.contains("jsonb_populate_record(null::\"orders\", $1::jsonb)"));
    }

    #[test]
    fn empty_body_uses_default_values_without_bind() {
        let (sql, binds_row) = insert_sql("orders", &NewOrder::default());
        assert!(!binds_row);
        assert!(sql.contains("default values"));
    }

    #[test]
    fn decode_row_keeps_column_types_and_rejects_scalars() {
        let row = decode_row(json!({"id": 1, "order_number": 1001})).unwrap();
        assert_eq!(row["order_number"], 1001);
        assert!(!row.contains_key("product"));

        assert_eq!(decode_row(json!(5)).unwrap_err().kind(), "decode");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("orders"), "\"orders\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
