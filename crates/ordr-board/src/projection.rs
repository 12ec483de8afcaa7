//! Read-only views over the loaded list. Computed on every render, never
//! stored.

use chrono::NaiveDate;
use ordr_schemas::Order;

/// Orders by ascending due date.
///
/// Stable: equal dates keep their list order. Orders whose due date is
/// missing or unparseable go last, also in list order.
pub fn by_due_date(orders: &[Order]) -> Vec<&Order> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by_key(|o| {
        let date = o.due_date.as_deref().and_then(parse_due_date);
        (date.is_none(), date)
    });
    sorted
}

/// `YYYY-MM-DD`, or the date part of a timestamp column
/// (`2024-01-01T00:00:00+00:00`, `2024-01-01 00:00:00`).
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    let date = raw.get(..10)?;
    let rest = raw.get(10..)?;
    if rest.starts_with('T') || rest.starts_with(' ') {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(id: i64, due: Option<&str>) -> Order {
        serde_json::from_value(json!({"id": id, "due_date": due})).unwrap()
    }

    fn dates<'a>(v: &[&'a Order]) -> Vec<Option<&'a str>> {
        v.iter().map(|o| o.due_date.as_deref()).collect()
    }

    #[test]
    fn sorts_ascending_regardless_of_input_order() {
        let orders = vec![
            order(1, Some("2024-03-01")),
            order(2, Some("2024-01-01")),
            order(3, Some("2024-02-01")),
        ];
        assert_eq!(
            dates(&by_due_date(&orders)),
            vec![Some("2024-01-01"), Some("2024-02-01"), Some("2024-03-01")]
        );

        let mut reversed = orders.clone();
        reversed.reverse();
        assert_eq!(dates(&by_due_date(&reversed)), dates(&by_due_date(&orders)));
    }

    #[test]
    fn compares_as_dates_not_strings() {
        // Not zero-padded: string order would put 2024-10-01 first.
        let orders = vec![order(1, Some("2024-10-01")), order(2, Some("2024-9-30"))];
        let ids: Vec<_> = by_due_date(&orders).iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn equal_dates_keep_list_order() {
        let orders = vec![
            order(5, Some("2024-01-01")),
            order(4, Some("2024-01-01")),
            order(3, Some("2023-12-31")),
        ];
        let ids: Vec<_> = by_due_date(&orders).iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "5", "4"]);
    }

    #[test]
    fn missing_and_bad_dates_go_last_in_list_order() {
        let orders = vec![
            order(1, None),
            order(2, Some("soon")),
            order(3, Some("2024-01-01")),
        ];
        let ids: Vec<_> = by_due_date(&orders).iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn timestamp_columns_sort_by_their_date() {
        assert_eq!(
            parse_due_date("2024-02-01T00:00:00+00:00"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(parse_due_date("2024-02-01x"), None);
    }

    #[test]
    fn projection_does_not_touch_the_source() {
        let orders = vec![order(1, Some("2024-03-01")), order(2, Some("2024-01-01"))];
        let _ = by_due_date(&orders);
        assert_eq!(orders[0].id.to_string(), "1");
    }
}
