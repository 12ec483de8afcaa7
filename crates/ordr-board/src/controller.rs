//! Drives a [`Board`] against an [`OrdersApi`].
//!
//! The board lock is never held across a network await: a fetch takes its
//! ticket under the lock, releases it, awaits the response, then re-locks to
//! apply. Overlapping fetches are therefore allowed and resolved by ticket.

use ordr_schemas::Order;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    api::{ApiError, OrdersApi},
    board::{Applied, Board, FetchPurpose, SubmitRefusal},
    draft::Field,
    render::{self, RenderOptions},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Create succeeded; the list was re-read afterwards. Carries the echoed
    /// row when the gateway returned a readable one.
    Created(Option<Order>),
    /// Create failed; the board shows the error and the draft is intact.
    Failed(ApiError),
    /// Nothing was sent.
    Refused(SubmitRefusal),
}

pub struct BoardController<A> {
    api: A,
    board: Mutex<Board>,
}

impl<A: OrdersApi> BoardController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            board: Mutex::new(Board::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Initial list fetch. No retry on failure.
    pub async fn mount(&self) -> Applied {
        self.refresh(FetchPurpose::Mount).await
    }

    /// Drop a standing error and load again. The draft survives.
    pub async fn reload(&self) -> Applied {
        self.board.lock().await.reload();
        self.refresh(FetchPurpose::Mount).await
    }

    pub async fn set_field(&self, field: Field, value: impl Into<String>) {
        self.board.lock().await.set_field(field, value);
    }

    /// Send the draft. On success the whole list is fetched again; nothing
    /// is inserted locally.
    pub async fn submit(&self) -> SubmitOutcome {
        let body = match self.board.lock().await.begin_submit() {
            Ok(body) => body,
            Err(refusal) => {
                debug!(?refusal, "submit refused");
                return SubmitOutcome::Refused(refusal);
            }
        };

        match self.api.create_order(&body).await {
            Ok(created) => {
                self.refresh(FetchPurpose::AfterSubmit).await;
                SubmitOutcome::Created(created)
            }
            Err(err) => {
                warn!(error = %err, "create failed");
                self.board.lock().await.submit_failed(&err);
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub async fn snapshot(&self) -> Board {
        self.board.lock().await.clone()
    }

    pub async fn render_text(&self, opts: RenderOptions) -> String {
        let board = self.board.lock().await;
        render::render_text(&board, opts)
    }

    async fn refresh(&self, purpose: FetchPurpose) -> Applied {
        let ticket = self.board.lock().await.begin_fetch(purpose);
        let result = self.api.list_orders().await;
        if let Err(err) = &result {
            warn!(?purpose, error = %err, "list failed");
        }

        let applied = self.board.lock().await.apply_fetch(ticket, result);
        if applied == Applied::Stale {
            debug!(generation = ticket.generation(), "stale list response dropped");
        }
        applied
    }
}
