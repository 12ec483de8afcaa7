//! The board view model.
//!
//! One tagged status instead of independent nullable slots, so "error set
//! while orders are shown" cannot be represented:
//!
//! ```text
//! Loading ──list ok──▶ Ready(orders) ──submit fails──▶ Failed{message}
//!    │                    ▲   │                          │
//!    └──list fails──▶ Failed   └──submit ok, relist ok────┘ (only via reload)
//! ```
//!
//! List fetches are ticketed. A response is applied only if its ticket is
//! newer than the last one applied, so when two fetches overlap the one
//! issued last decides the displayed list regardless of completion order.

use ordr_schemas::{NewOrder, Order};

use crate::{
    api::ApiError,
    draft::{Field, OrderDraft},
};

/// Shown when the refresh that follows a successful create is refused.
pub const AFTER_ADD_FALLBACK: &str = "Failed to fetch orders after adding";

#[derive(Debug, Clone, PartialEq)]
pub enum BoardStatus {
    Loading,
    Ready(Vec<Order>),
    /// Terminal until [`Board::reload`]. `last_orders` is the last list that
    /// was loaded, kept so a reload-free recovery is possible; it is never
    /// rendered while the error stands.
    Failed {
        message: String,
        last_orders: Option<Vec<Order>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPurpose {
    Mount,
    AfterSubmit,
}

/// Issued by [`Board::begin_fetch`]; hand it back with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    purpose: FetchPurpose,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn purpose(&self) -> FetchPurpose {
        self.purpose
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// A newer fetch was already applied; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRefusal {
    /// The form is only shown, and so only submittable, on a ready board.
    NotReady,
    /// Required fields are empty.
    Incomplete(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    status: BoardStatus,
    draft: OrderDraft,
    issued: u64,
    applied: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            status: BoardStatus::Loading,
            draft: OrderDraft::default(),
            issued: 0,
            applied: 0,
        }
    }

    pub fn status(&self) -> &BoardStatus {
        &self.status
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Last loaded list, whether or not it is currently displayed.
    pub fn orders(&self) -> Option<&[Order]> {
        match &self.status {
            BoardStatus::Ready(orders) => Some(orders),
            BoardStatus::Failed { last_orders, .. } => last_orders.as_deref(),
            BoardStatus::Loading => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            BoardStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Clear a failure and go back to loading. The draft survives.
    pub fn reload(&mut self) {
        self.status = BoardStatus::Loading;
    }

    pub fn begin_fetch(&mut self, purpose: FetchPurpose) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            generation: self.issued,
            purpose,
        }
    }

    /// Apply a list response.
    ///
    /// - Stale tickets change nothing, except that a successful refresh after
    ///   a create still resets the draft: the create itself went through.
    /// - A mount-time success does not clear a standing failure; it only
    ///   refreshes `last_orders`.
    /// - A post-create success replaces the list, clears the failure and
    ///   resets the draft.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Order>, ApiError>,
    ) -> Applied {
        if ticket.generation <= self.applied {
            if ticket.purpose == FetchPurpose::AfterSubmit && result.is_ok() {
                self.draft.clear();
            }
            return Applied::Stale;
        }
        self.applied = ticket.generation;

        match result {
            Ok(orders) => {
                match ticket.purpose {
                    FetchPurpose::Mount => {
                        if let BoardStatus::Failed { last_orders, .. } = &mut self.status {
                            *last_orders = Some(orders);
                            return Applied::Applied;
                        }
                    }
                    FetchPurpose::AfterSubmit => self.draft.clear(),
                }
                self.status = BoardStatus::Ready(orders);
            }
            Err(err) => {
                let message = match (ticket.purpose, &err) {
                    (FetchPurpose::AfterSubmit, ApiError::Status { .. }) => {
                        AFTER_ADD_FALLBACK.to_string()
                    }
                    _ => err.to_string(),
                };
                self.fail(message);
            }
        }

        Applied::Applied
    }

    /// Validate the draft and produce the request body.
    pub fn begin_submit(&self) -> Result<NewOrder, SubmitRefusal> {
        if !matches!(self.status, BoardStatus::Ready(_)) {
            return Err(SubmitRefusal::NotReady);
        }
        let missing = self.draft.missing();
        if !missing.is_empty() {
            return Err(SubmitRefusal::Incomplete(missing));
        }
        Ok(self.draft.to_new_order())
    }

    /// Record a failed create. The draft and the loaded list are kept; no
    /// row is added locally.
    pub fn submit_failed(&mut self, err: &ApiError) {
        self.fail(err.to_string());
    }

    fn fail(&mut self, message: String) {
        let last_orders = self.orders().map(<[Order]>::to_vec);
        self.status = BoardStatus::Failed {
            message,
            last_orders,
        };
    }
}
