//! Basic-shape tests: clause assembly, TOP-X placement, validation.

use pretty_assertions::assert_eq;

use super::grouped_count;
use crate::dialect::Dialect;
use crate::error::CrossqlError;
use crate::model::{AggregateRequest, QueryComponent};

fn compile(dialect: Dialect, request: &crate::model::AggregateRequest) -> String {
    dialect.profile().aggregate_sql(request).unwrap()
}

#[test]
fn test_grouped_count() {
    assert_eq!(
        compile(Dialect::Postgres, &grouped_count()),
        "SELECT COUNT(*), region FROM orders GROUP BY region"
    );
}

#[test]
fn test_where_and_order() {
    let request = grouped_count()
        .filter("region IS NOT NULL")
        .filter("amount > 0")
        .order_by("region ASC");
    assert_eq!(
        compile(Dialect::Postgres, &request),
        "SELECT COUNT(*), region FROM orders WHERE region IS NOT NULL AND amount > 0 GROUP BY region ORDER BY region ASC"
    );
}

#[test]
fn test_having() {
    let request = grouped_count().line("COUNT(*) > 10", QueryComponent::Having);
    assert_eq!(
        compile(Dialect::MySql, &request),
        "SELECT COUNT(*), region FROM orders GROUP BY region HAVING COUNT(*) > 10"
    );
}

#[test]
fn test_join_lines_follow_from() {
    let request = grouped_count().line(
        "INNER JOIN customers ON customers.id = orders.customer_id",
        QueryComponent::JoinInfoJoin,
    );
    assert_eq!(
        compile(Dialect::Postgres, &request),
        "SELECT COUNT(*), region FROM orders INNER JOIN customers ON customers.id = orders.customer_id GROUP BY region"
    );
}

#[test]
fn test_inline_top_splices_after_select() {
    // The limiting token must follow SELECT, never trail the statement.
    let request = grouped_count().order_by("COUNT(*) DESC").limit(2);
    let sql = compile(Dialect::SqlServer, &request);
    assert_eq!(
        sql,
        "SELECT TOP 2 COUNT(*), region FROM orders GROUP BY region ORDER BY COUNT(*) DESC"
    );
    assert!(sql.starts_with("SELECT TOP 2 "));
}

#[test]
fn test_trailing_limit() {
    let request = grouped_count().limit(5);
    assert_eq!(
        compile(Dialect::MySql, &request),
        "SELECT COUNT(*), region FROM orders GROUP BY region LIMIT 5"
    );
}

#[test]
fn test_offset_paging_with_order_by() {
    let request = grouped_count().order_by("region ASC").limit(10).offset(5);
    assert_eq!(
        compile(Dialect::SqlServer, &request),
        "SELECT COUNT(*), region FROM orders GROUP BY region ORDER BY region ASC OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn test_offset_without_order_by_fails() {
    // No SQL comes back; the compiler refuses to invent an ordering.
    let request = grouped_count().limit(10).offset(5);
    let result = Dialect::SqlServer.profile().aggregate_sql(&request);
    assert!(matches!(
        result,
        Err(CrossqlError::MissingOrderBy {
            dialect: Dialect::SqlServer
        })
    ));
}

#[test]
fn test_missing_count_expression_rejected() {
    let request = AggregateRequest::new().from("orders").group_by("region");
    let result = Dialect::Postgres.profile().aggregate_sql(&request);
    assert!(matches!(result, Err(CrossqlError::MalformedRequest(_))));
}

#[test]
fn test_duplicate_count_expression_rejected() {
    let request = grouped_count().count("SUM(amount)");
    let result = Dialect::Postgres.profile().aggregate_sql(&request);
    assert!(matches!(result, Err(CrossqlError::MalformedRequest(_))));
}

#[test]
fn test_missing_from_rejected() {
    let request = AggregateRequest::new().count("COUNT(*)");
    let result = Dialect::Postgres.profile().aggregate_sql(&request);
    assert!(matches!(result, Err(CrossqlError::MalformedRequest(_))));
}

#[test]
fn test_postfix_lines_trail_everything() {
    let request = grouped_count().line("OPTION (RECOMPILE)", QueryComponent::Postfix);
    assert_eq!(
        compile(Dialect::SqlServer, &request),
        "SELECT COUNT(*), region FROM orders GROUP BY region OPTION (RECOMPILE)"
    );
}
