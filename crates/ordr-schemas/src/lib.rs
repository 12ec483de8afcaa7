//! Wire types shared by the gateway, the record stores and the board client.
//!
//! The record store is the only authority on schema. Between the store and
//! the gateway a row is an untyped [`Row`], relayed as-is; [`Order`] is the
//! client's typed reading of one.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Name of the record-store collection holding orders.
pub const ORDERS_COLLECTION: &str = "orders";

/// One store row, column name to value, exactly as the store returned it.
pub type Row = Map<String, Value>;

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Store-assigned identifier. Hosted stores hand out either integer identity
/// columns or string keys (uuid, text), so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderId {
    Int(i64),
    Text(String),
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Int(n) => write!(f, "{n}"),
            OrderId::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Quantity
// ---------------------------------------------------------------------------

/// Quantity exactly as the store returned it.
///
/// Submitted as raw text from the form; a numeric column coerces it, a text
/// column keeps it. Neither form is normalised into the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{n}"),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// Client view of one row of the `orders` collection.
///
/// Text columns accept any scalar (a numeric `order_number` reads as its
/// digits). Missing columns are `None` and are not written back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default, deserialize_with = "text_column", skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "text_column", skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "text_column", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Any other columns the store returns (`created_at`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn text_column<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

// ---------------------------------------------------------------------------
// NewOrder
// ---------------------------------------------------------------------------

/// Body of `POST /orders`.
///
/// Fields are arbitrary JSON and are not validated here. Absent fields stay
/// absent when forwarded to the store; unknown fields are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
}

impl NewOrder {
    /// Build a body from four text fields, as the order form submits them.
    pub fn from_text(
        order_number: impl Into<String>,
        product: impl Into<String>,
        quantity: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            order_number: Some(Value::String(order_number.into())),
            product: Some(Value::String(product.into())),
            quantity: Some(Value::String(quantity.into())),
            due_date: Some(Value::String(due_date.into())),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorBody
// ---------------------------------------------------------------------------

/// The only error envelope the gateway emits: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
