//! The axis-only shape: a dense calendar spine LEFT JOINed to the caller's
//! aggregate, zero-filling the buckets the data skips.

use crate::aggregate::dates::AggregateDialect;
use crate::aggregate::{from_clause, having_clause, postfix_lines, where_clause};
use crate::error::{CrossqlError, CrossqlResult};
use crate::model::{AggregateRequest, Increment, LineRole, LogicalType};
use crate::syntax::{SqlSyntax, TopPlacement};

/// `WITH <spine> SELECT <bucket> AS bucket, COALESCE(agg, 0) FROM
/// calendar_axis LEFT JOIN (<data side>) ON <bucket expr> = <bucket expr>
/// ORDER BY bucket_date ASC`
///
/// Both join operands come from the same `bucket_expr`, applied to the spine
/// date on one side and the caller's axis column on the other. Year buckets
/// are cast to the dialect's integer type on output only; the join predicate
/// stays in the spine's native text form.
pub fn build_axis_only(
    request: &AggregateRequest,
    syntax: &dyn SqlSyntax,
    dates: &dyn AggregateDialect,
) -> CrossqlResult<String> {
    let spec = request
        .axis
        .ok_or_else(|| CrossqlError::malformed("axis shape without an AxisSpec"))?;
    let axis_line = request
        .role_line(LineRole::AxisColumn)
        .ok_or_else(|| CrossqlError::malformed("axis shape without an AxisColumn line"))?;
    let count_line = request
        .role_line(LineRole::CountExpression)
        .ok_or_else(|| CrossqlError::malformed("axis shape without a CountExpression line"))?;

    let spine_bucket = dates.bucket_expr("bucket_date", spec.increment);
    let data_bucket = dates.bucket_expr(&axis_line.text, spec.increment);
    let bucket_select = if spec.increment == Increment::Year {
        syntax.cast_expr(&spine_bucket, LogicalType::Int)?
    } else {
        spine_bucket.clone()
    };

    let inner = format!(
        "SELECT {} AS axis_bucket, {} AS agg_value {}{} GROUP BY {}{}",
        data_bucket,
        count_line.text,
        from_clause(request),
        where_clause(request),
        data_bucket,
        having_clause(request),
    );

    let top = syntax.top_x(request.limit, request.offset);
    let mut head = String::from("SELECT ");
    if let Some(t) = &top {
        if t.placement == TopPlacement::InlineAfterSelect {
            head.push_str(&t.clause);
        }
    }

    let mut sql = format!(
        "{} {}{} AS bucket, COALESCE(axis_data.agg_value, 0) AS agg_value FROM calendar_axis LEFT JOIN ({}) {} ON {} = axis_data.axis_bucket ORDER BY bucket_date ASC",
        dates.spine_with_clause(&spec),
        head,
        bucket_select,
        inner,
        syntax.table_alias("axis_data"),
        spine_bucket,
    );

    // The spine always orders its output, so trailing paging never trips the
    // ORDER BY requirement here.
    if let Some(t) = &top {
        if t.placement == TopPlacement::TrailingClause {
            sql.push_str(&t.clause);
        }
    }
    sql.push_str(&postfix_lines(request));
    if let Some(postfix) = dates.spine_postfix() {
        sql.push(' ');
        sql.push_str(postfix);
    }

    Ok(sql)
}
