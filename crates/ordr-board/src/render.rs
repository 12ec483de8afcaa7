//! Plain-text rendering of the board.
//!
//! [`screen`] decides *what* is visible (the rendering policy), and
//! [`render_text`] lays it out. Keeping them apart lets tests assert on the
//! policy without string matching.

use std::fmt::Write as _;

use ordr_schemas::Order;

use crate::{
    board::{Board, BoardStatus},
    draft::{Field, OrderDraft},
    projection,
};

pub const LOADING_TEXT: &str = "Loading orders...";

const COLUMNS: [&str; 5] = ["ID", "Order #", "Product", "Qty", "Due Date"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Also show the list sorted by ascending due date.
    pub by_due_date: bool,
}

#[derive(Debug, PartialEq)]
pub enum Screen<'a> {
    /// Only the message; form and list are hidden.
    Error(&'a str),
    Loading,
    Board {
        draft: &'a OrderDraft,
        orders: &'a [Order],
        by_due_date: Option<Vec<&'a Order>>,
    },
}

pub fn screen(board: &Board, opts: RenderOptions) -> Screen<'_> {
    match board.status() {
        BoardStatus::Failed { message, .. } => Screen::Error(message),
        BoardStatus::Loading => Screen::Loading,
        BoardStatus::Ready(orders) => Screen::Board {
            draft: board.draft(),
            orders,
            by_due_date: opts.by_due_date.then(|| projection::by_due_date(orders)),
        },
    }
}

pub fn render_text(board: &Board, opts: RenderOptions) -> String {
    match screen(board, opts) {
        Screen::Error(message) => format!("Error: {message}\n"),
        Screen::Loading => format!("{LOADING_TEXT}\n"),
        Screen::Board {
            draft,
            orders,
            by_due_date,
        } => {
            let mut out = String::new();
            render_form(&mut out, draft);
            out.push('\n');
            render_table(&mut out, orders.iter());
            if let Some(sorted) = by_due_date {
                out.push_str("\nBy due date\n");
                render_table(&mut out, sorted.into_iter());
            }
            out
        }
    }
}

fn render_form(out: &mut String, draft: &OrderDraft) {
    let width = Field::ALL
        .iter()
        .map(|f| f.label().len())
        .max()
        .unwrap_or(0);
    for field in Field::ALL {
        let value = draft.get(field);
        let shown = if value.is_empty() { "_" } else { value };
        let _ = writeln!(out, "{:<width$}  {}", field.label(), shown);
    }
}

fn cells(order: &Order) -> [String; 5] {
    [
        order.id.to_string(),
        order.order_number.clone().unwrap_or_default(),
        order.product.clone().unwrap_or_default(),
        order
            .quantity
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        order.due_date.clone().unwrap_or_default(),
    ]
}

fn render_table<'a>(out: &mut String, orders: impl Iterator<Item = &'a Order>) {
    let rows: Vec<[String; 5]> = orders.map(cells).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = COLUMNS.map(str::to_string);
    let rule = widths.map(|w| "-".repeat(w));
    write_row(out, &header, &widths);
    write_row(out, &rule, &widths);
    for row in &rows {
        write_row(out, row, &widths);
    }
}

fn write_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::ApiError, board::FetchPurpose};
    use serde_json::json;

    fn ready_board() -> Board {
        let rows: Vec<Order> = serde_json::from_value(json!([
            {"id": 1, "order_number": "O-1", "product": "Widget", "quantity": 5, "due_date": "2024-03-01"},
            {"id": 2, "order_number": "O-2", "product": "Gadget", "quantity": "12", "due_date": "2024-01-01"}
        ]))
        .unwrap();
        let mut b = Board::new();
        let t = b.begin_fetch(FetchPurpose::Mount);
        b.apply_fetch(t, Ok(rows));
        b
    }

    #[test]
    fn error_hides_form_and_list() {
        let mut b = ready_board();
        b.submit_failed(&ApiError::Transport("store unreachable".into()));

        assert_eq!(screen(&b, RenderOptions::default()), Screen::Error("store unreachable"));
        let text = render_text(&b, RenderOptions { by_due_date: true });
        assert_eq!(text, "Error: store unreachable\n");
    }

    #[test]
    fn loading_shows_only_indicator() {
        let b = Board::new();
        assert_eq!(render_text(&b, RenderOptions::default()), "Loading orders...\n");
    }

    #[test]
    fn ready_renders_form_and_table() {
        let text = render_text(&ready_board(), RenderOptions::default());
        assert!(text.contains("Order Number  _"));
        assert!(text.contains("ID  Order #  Product  Qty  Due Date"));
        assert!(text.contains("1   O-1      Widget   5    2024-03-01"));
        assert!(text.contains("2   O-2      Gadget   12   2024-01-01"));
        assert!(!text.contains("By due date"));
    }

    #[test]
    fn due_date_view_is_a_projection_only() {
        let b = ready_board();
        let Screen::Board {
            orders,
            by_due_date: Some(sorted),
            ..
        } = screen(&b, RenderOptions { by_due_date: true })
        else {
            panic!("expected board screen");
        };

        assert_eq!(orders[0].id.to_string(), "1", "source list keeps store order");
        let sorted_ids: Vec<_> = sorted.iter().map(|o| o.id.to_string()).collect();
        assert_eq!(sorted_ids, vec!["2", "1"]);

        let text = render_text(&b, RenderOptions { by_due_date: true });
        let tail = text.split("By due date\n").nth(1).unwrap();
        assert!(tail.find("O-2").unwrap() < tail.find("O-1").unwrap());
    }
}
