//! Pivot-shape tests: value selection, discovery query, CASE columns,
//! pivot-and-axis composition.

use pretty_assertions::assert_eq;

use super::date;
use crate::aggregate::pivot::select_top_values;
use crate::aggregate::AggregateShape;
use crate::dialect::Dialect;
use crate::error::CrossqlError;
use crate::model::{AggregateRequest, AxisSpec, Increment, PivotSpec, PivotValue};

fn status_pivot(values: Vec<PivotValue>, max: usize) -> AggregateRequest {
    AggregateRequest::new()
        .count("COUNT(*)")
        .from("orders")
        .group_by("region")
        .pivot_column("status")
        .with_pivot(PivotSpec::new(values, max))
}

fn open_closed() -> Vec<PivotValue> {
    vec![PivotValue::new("open", 10), PivotValue::new("closed", 7)]
}

#[test]
fn test_top_values_by_frequency_desc() {
    let spec = PivotSpec::new(
        vec![
            PivotValue::new("a", 5),
            PivotValue::new("b", 9),
            PivotValue::new("c", 2),
        ],
        2,
    );
    let selected: Vec<&str> = select_top_values(&spec)
        .iter()
        .map(|v| v.value.as_str())
        .collect();
    assert_eq!(selected, vec!["b", "a"]);
}

#[test]
fn test_top_values_ties_keep_input_order() {
    // Stable by first occurrence; no stronger guarantee.
    let spec = PivotSpec::new(
        vec![
            PivotValue::new("later", 5),
            PivotValue::new("earlier", 5),
            PivotValue::new("rare", 1),
        ],
        2,
    );
    let selected: Vec<&str> = select_top_values(&spec)
        .iter()
        .map(|v| v.value.as_str())
        .collect();
    assert_eq!(selected, vec!["later", "earlier"]);
}

#[test]
fn test_mysql_pivot_only() {
    let request = status_pivot(open_closed(), 2);
    let sql = Dialect::MySql.profile().aggregate_sql(&request).unwrap();
    assert_eq!(
        sql,
        "SELECT grp_1, SUM(CASE WHEN pivot_value = 'open' THEN agg_value ELSE 0 END) AS `open`, SUM(CASE WHEN pivot_value = 'closed' THEN agg_value ELSE 0 END) AS `closed` \
         FROM (SELECT region AS grp_1, status AS pivot_value, COUNT(*) AS agg_value FROM orders GROUP BY region, status) AS pivot_source GROUP BY grp_1"
    );
}

#[test]
fn test_pivot_without_group_columns() {
    let request = AggregateRequest::new()
        .count("COUNT(*)")
        .from("orders")
        .pivot_column("status")
        .with_pivot(PivotSpec::new(open_closed(), 2));
    let sql = Dialect::Postgres.profile().aggregate_sql(&request).unwrap();
    assert_eq!(
        sql,
        "SELECT SUM(CASE WHEN pivot_value = 'open' THEN agg_value ELSE 0 END) AS \"open\", SUM(CASE WHEN pivot_value = 'closed' THEN agg_value ELSE 0 END) AS \"closed\" \
         FROM (SELECT status AS pivot_value, COUNT(*) AS agg_value FROM orders GROUP BY status) AS pivot_source"
    );
}

#[test]
fn test_pivot_value_aliases_are_escaped() {
    let values = vec![PivotValue::new("it's", 3)];
    let request = status_pivot(values, 1);
    let sql = Dialect::Postgres.profile().aggregate_sql(&request).unwrap();
    // Literal gets its quote doubled; the column alias keeps the raw text.
    assert!(sql.contains("WHEN pivot_value = 'it''s' THEN"));
    assert!(sql.contains("ELSE 0 END) AS \"it's\""));
}

#[test]
fn test_empty_value_list_rejected() {
    let request = status_pivot(Vec::new(), 4);
    let result = Dialect::Postgres.profile().aggregate_sql(&request);
    assert!(matches!(result, Err(CrossqlError::MalformedRequest(_))));
}

#[test]
fn test_discovery_query_inline_top() {
    let request = status_pivot(Vec::new(), 2);
    let sql = Dialect::SqlServer.profile().pivot_values_sql(&request).unwrap();
    assert_eq!(
        sql,
        "SELECT TOP 2 status AS pivot_value, COUNT(*) AS frequency FROM orders GROUP BY status ORDER BY COUNT(*) DESC"
    );
}

#[test]
fn test_discovery_query_trailing_limit() {
    let request = status_pivot(Vec::new(), 2).filter("region IS NOT NULL");
    let sql = Dialect::MySql.profile().pivot_values_sql(&request).unwrap();
    assert_eq!(
        sql,
        "SELECT status AS pivot_value, COUNT(*) AS frequency FROM orders WHERE region IS NOT NULL GROUP BY status ORDER BY COUNT(*) DESC LIMIT 2"
    );
}

#[test]
fn test_postgres_pivot_and_axis() {
    let request = AggregateRequest::new()
        .count("COUNT(*)")
        .from("events")
        .axis_column("created_at")
        .pivot_column("status")
        .with_axis(AxisSpec::new(
            date(2023, 1, 1),
            date(2023, 3, 1),
            Increment::Month,
        ))
        .with_pivot(PivotSpec::new(open_closed(), 2));
    let sql = Dialect::Postgres.profile().aggregate_sql(&request).unwrap();
    assert_eq!(
        sql,
        "WITH calendar_axis (bucket_date) AS (SELECT bucket_date FROM GENERATE_SERIES(DATE '2023-01-01', DATE '2023-03-01', INTERVAL '1 month') AS g(bucket_date)) \
         SELECT TO_CHAR(bucket_date, 'YYYY-MM') AS bucket, SUM(CASE WHEN axis_data.pivot_value = 'open' THEN axis_data.agg_value ELSE 0 END) AS \"open\", SUM(CASE WHEN axis_data.pivot_value = 'closed' THEN axis_data.agg_value ELSE 0 END) AS \"closed\" \
         FROM calendar_axis LEFT JOIN (SELECT TO_CHAR(created_at, 'YYYY-MM') AS axis_bucket, status AS pivot_value, COUNT(*) AS agg_value FROM events GROUP BY TO_CHAR(created_at, 'YYYY-MM'), status) AS axis_data \
         ON TO_CHAR(bucket_date, 'YYYY-MM') = axis_data.axis_bucket GROUP BY TO_CHAR(bucket_date, 'YYYY-MM') ORDER BY MIN(bucket_date) ASC"
    );
}

#[test]
fn test_oracle_rejects_pivot_and_axis() {
    // Preserved capability gap: Oracle supports each shape alone, not both.
    let request = AggregateRequest::new()
        .count("COUNT(*)")
        .from("events")
        .axis_column("created_at")
        .pivot_column("status")
        .with_axis(AxisSpec::new(
            date(2023, 1, 1),
            date(2023, 3, 1),
            Increment::Month,
        ))
        .with_pivot(PivotSpec::new(open_closed(), 2));
    let result = Dialect::Oracle.profile().aggregate_sql(&request);
    assert!(matches!(
        result,
        Err(CrossqlError::UnsupportedPivot {
            dialect: Dialect::Oracle,
            shape: AggregateShape::PivotAndAxis,
        })
    ));
}

#[test]
fn test_pivot_requested_without_tagged_line() {
    let request = AggregateRequest::new()
        .count("COUNT(*)")
        .from("orders")
        .with_pivot(PivotSpec::new(open_closed(), 2));
    let result = Dialect::Postgres.profile().aggregate_sql(&request);
    assert!(matches!(result, Err(CrossqlError::MalformedRequest(_))));
}
