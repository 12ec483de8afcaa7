//! Scenario: a submit issued before the mount-time list fetch resolves.
//!
//! Both list fetches run to completion. The mount response arrives last but
//! was issued first, so it must not overwrite the fresher post-submit list.
//!
//! List responses are released by hand through oneshot channels, so the
//! completion order is fixed by the test rather than by timing.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use ordr_board::{
    api::{ApiError, OrdersApi},
    board::{Applied, BoardStatus, FetchPurpose},
    controller::{BoardController, SubmitOutcome},
    draft::Field,
};
use ordr_schemas::{NewOrder, Order};
use serde_json::json;
use tokio::sync::oneshot;

type ListReply = Result<Vec<Order>, ApiError>;

struct GatedApi {
    gates: Mutex<VecDeque<oneshot::Receiver<ListReply>>>,
    list_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl OrdersApi for GatedApi {
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected list call");
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        gate.await.expect("gate dropped")
    }

    async fn create_order(&self, _order: &NewOrder) -> Result<Option<Order>, ApiError> {
        Ok(Some(order(2, "O-2")))
    }
}

fn order(id: i64, number: &str) -> Order {
    serde_json::from_value(json!({"id": id, "order_number": number})).unwrap()
}

async fn wait_for_list_calls(api: &GatedApi, n: usize) {
    while api.list_calls.load(Ordering::SeqCst) < n {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn stale_mount_response_does_not_overwrite_post_submit_list() {
    let (mount_tx, mount_rx) = oneshot::channel::<ListReply>();
    let (refresh_tx, refresh_rx) = oneshot::channel::<ListReply>();
    let ctl = Arc::new(BoardController::new(GatedApi {
        gates: Mutex::new(VecDeque::from([mount_rx, refresh_rx])),
        list_calls: AtomicUsize::new(0),
    }));

    // A first load that resolves at once, so the form is shown.
    {
        let (tx, rx) = oneshot::channel::<ListReply>();
        ctl.api().gates.lock().unwrap().push_front(rx);
        tx.send(Ok(vec![order(1, "O-1")])).unwrap();
        assert_eq!(ctl.mount().await, Applied::Applied);
    }

    // Mount again (page re-mount); its response is held back.
    let slow_mount = tokio::spawn({
        let ctl = Arc::clone(&ctl);
        async move { ctl.mount().await }
    });
    wait_for_list_calls(ctl.api(), 2).await;

    for (f, v) in [
        (Field::OrderNumber, "O-2"),
        (Field::Product, "Gadget"),
        (Field::Quantity, "1"),
        (Field::DueDate, "2024-02-01"),
    ] {
        ctl.set_field(f, v).await;
    }
    let submit = tokio::spawn({
        let ctl = Arc::clone(&ctl);
        async move { ctl.submit().await }
    });
    wait_for_list_calls(ctl.api(), 3).await;

    // Post-submit refresh resolves first with the fresh list...
    refresh_tx
        .send(Ok(vec![order(1, "O-1"), order(2, "O-2")]))
        .unwrap();
    assert!(matches!(submit.await.unwrap(), SubmitOutcome::Created(_)));

    // ...then the older mount response straggles in.
    mount_tx.send(Ok(vec![order(1, "O-1")])).unwrap();
    assert_eq!(slow_mount.await.unwrap(), Applied::Stale);

    let board = ctl.snapshot().await;
    match board.status() {
        BoardStatus::Ready(orders) => assert_eq!(orders.len(), 2, "fresher list must win"),
        other => panic!("expected Ready, got {other:?}"),
    }
    assert!(board.draft().is_blank());
}

#[tokio::test]
async fn fetch_purpose_is_carried_on_the_ticket() {
    let mut board = ordr_board::Board::new();
    let t = board.begin_fetch(FetchPurpose::AfterSubmit);
    assert_eq!(t.purpose(), FetchPurpose::AfterSubmit);
    assert_eq!(t.generation(), 1);
}
