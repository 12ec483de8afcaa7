//! Scenario: the hosted REST backend speaks the PostgREST contract.
//!
//! - select sends `select=*` plus `apikey` and bearer headers
//! - insert sends a one-element array with `Prefer: return=representation`
//! - service errors are relayed with the service's own message
//! - an unreachable service is a transport error
//!
//! All tests run against a local httpmock server; no real network.

use httpmock::prelude::*;
use ordr_schemas::NewOrder;
use ordr_store::{RecordStore, RestRecordStore, StoreError};
use serde_json::json;

const KEY: &str = "test-service-key";

#[tokio::test]
async fn select_all_sends_auth_headers_and_keeps_store_order() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/orders")
                .query_param("select", "*")
                .header("apikey", KEY)
                .header("authorization", format!("Bearer {KEY}"));
            then.status(200).json_body(json!([
                {"id": 3, "order_number": "O-3", "product": "C", "quantity": 1, "due_date": "2024-03-01"},
                {"id": 1, "order_number": "O-1", "product": "A", "quantity": 5, "due_date": "2024-01-01"}
            ]));
        })
        .await;

    let store = RestRecordStore::new(server.base_url(), KEY);
    let rows = store.select_all("orders").await?;

    mock.assert_async().await;
    let ids: Vec<_> = rows.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(3), json!(1)]);
    Ok(())
}

#[tokio::test]
async fn insert_posts_array_and_asks_for_representation() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/orders")
                .header("prefer", "return=representation")
                .header("apikey", KEY)
                .json_body(json!([{
                    "order_number": "O-1",
                    "product": "Widget",
                    "quantity": "5",
                    "due_date": "2024-01-01"
                }]));
            then.status(201).json_body(json!([{
                "id": 10,
                "order_number": "O-1",
                "product": "Widget",
                "quantity": 5,
                "due_date": "2024-01-01",
                "created_at": "2024-01-01T09:00:00+00:00"
            }]));
        })
        .await;

    let store = RestRecordStore::new(server.base_url(), KEY);
    let rows = store
        .insert_returning(
            "orders",
            &NewOrder::from_text("O-1", "Widget", "5", "2024-01-01"),
        )
        .await?;

    mock.assert_async().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], 10);
    assert_eq!(rows[0]["quantity"], 5);
    assert_eq!(rows[0]["created_at"], "2024-01-01T09:00:00+00:00");
    Ok(())
}

#[tokio::test]
async fn rows_keep_the_store_column_types_and_omissions() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/orders");
            then.status(200)
                .json_body(json!([{"id": 1, "order_number": 1001, "quantity": "07"}]));
        })
        .await;

    let store = RestRecordStore::new(server.base_url(), KEY);
    let rows = store.select_all("orders").await?;

    assert_eq!(
        serde_json::Value::Object(rows[0].clone()),
        json!({"id": 1, "order_number": 1001, "quantity": "07"})
    );
    Ok(())
}

#[tokio::test]
async fn insert_with_empty_representation_returns_no_rows() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/orders");
            then.status(201).json_body(json!([]));
        })
        .await;

    let store = RestRecordStore::new(server.base_url(), KEY);
    let rows = store
        .insert_returning("orders", &NewOrder::from_text("O-1", "W", "1", "2024-01-01"))
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn service_error_message_is_relayed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/orders");
            then.status(401)
                .json_body(json!({"message": "Invalid API key", "hint": "Double check your key"}));
        })
        .await;

    let store = RestRecordStore::new(server.base_url(), "wrong");
    let err = store.select_all("orders").await.unwrap_err();

    assert_eq!(
        err,
        StoreError::Api {
            status: Some(401),
            message: "Invalid API key".to_string()
        }
    );
}

#[tokio::test]
async fn non_list_payload_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/orders");
            then.status(200).json_body(json!({"id": 1}));
        })
        .await;

    let store = RestRecordStore::new(server.base_url(), KEY);
    let err = store.select_all("orders").await.unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    // Port 9 (discard) on localhost is not served in test environments.
    let store = RestRecordStore::new("http://127.0.0.1:9", KEY);
    let err = store.select_all("orders").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
    assert!(!err.message().is_empty());
}
