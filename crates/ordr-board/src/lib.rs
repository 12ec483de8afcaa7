//! ordr-board
//!
//! Client side of the order board: talks to the gateway, holds the view
//! model, and renders it.
//!
//! - [`api`]: the gateway contract ([`OrdersApi`]) and its HTTP client.
//! - [`board`]: the view model, a tagged status plus the form draft.
//! - [`controller`]: async orchestration of mount / submit against an API.
//! - [`draft`]: the new-order form.
//! - [`projection`]: read-only views computed at render time.
//! - [`render`]: plain-text rendering for terminals.

pub mod api;
pub mod board;
pub mod controller;
pub mod draft;
pub mod projection;
pub mod render;

pub use api::{ApiError, HttpOrdersApi, OrdersApi};
pub use board::{Applied, Board, BoardStatus, FetchPurpose, FetchTicket, SubmitRefusal};
pub use controller::{BoardController, SubmitOutcome};
pub use draft::{Field, OrderDraft};
