//! The new-order form.
//!
//! Every field is raw text straight from the input; nothing is coerced or
//! range-checked here. The only rule is the form's `required` attribute:
//! an empty field blocks submission.

use std::{fmt, str::FromStr};

use ordr_schemas::NewOrder;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    OrderNumber,
    Product,
    Quantity,
    DueDate,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::OrderNumber,
        Field::Product,
        Field::Quantity,
        Field::DueDate,
    ];

    /// Wire / input name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::OrderNumber => "order_number",
            Field::Product => "product",
            Field::Quantity => "quantity",
            Field::DueDate => "due_date",
        }
    }

    /// Placeholder shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            Field::OrderNumber => "Order Number",
            Field::Product => "Product",
            Field::Quantity => "Quantity",
            Field::DueDate => "Due Date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown form field '{0}'; expected one of: order_number | product | quantity | due_date")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Draft record bound to the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub order_number: String,
    pub product: String,
    pub quantity: String,
    pub due_date: String,
}

impl OrderDraft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::OrderNumber => &self.order_number,
            Field::Product => &self.product,
            Field::Quantity => &self.quantity,
            Field::DueDate => &self.due_date,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::OrderNumber => &mut self.order_number,
            Field::Product => &mut self.product,
            Field::Quantity => &mut self.quantity,
            Field::DueDate => &mut self.due_date,
        };
        *slot = value.into();
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Fields that would fail the form's `required` check, in form order.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }

    /// Request body; quantity goes out as the raw input text.
    pub fn to_new_order(&self) -> NewOrder {
        NewOrder::from_text(
            self.order_number.clone(),
            self.product.clone(),
            self.quantity.clone(),
            self.due_date.clone(),
        )
    }
}
