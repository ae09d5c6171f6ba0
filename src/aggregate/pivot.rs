//! The pivot shapes: distinct values of one column become output columns,
//! each holding the aggregate filtered to that value.

use crate::aggregate::dates::AggregateDialect;
use crate::aggregate::{
    component_texts, from_clause, having_clause, postfix_lines, where_clause,
};
use crate::error::{CrossqlError, CrossqlResult};
use crate::model::{
    AggregateRequest, Increment, LineRole, LogicalType, PivotSpec, PivotValue, QueryComponent,
};
use crate::syntax::{SqlSyntax, TopPlacement};

/// The values that materialize as output columns: the `max_columns` most
/// frequent, descending, ties kept in input order (stable sort — the order
/// the caller observed the values in is the only tie-break guarantee).
pub fn select_top_values(spec: &PivotSpec) -> Vec<&PivotValue> {
    let mut selected: Vec<&PivotValue> = spec.values.iter().collect();
    selected.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    selected.truncate(spec.max_columns);
    selected
}

/// The discovery query a caller runs to obtain `(value, frequency)` pairs
/// for `PivotSpec::values`: top-N distinct pivot values by `COUNT(*) DESC`
/// over the ungrouped data, limited through the dialect's TOP-X strategy.
pub fn build_pivot_values_sql(
    request: &AggregateRequest,
    syntax: &dyn SqlSyntax,
) -> CrossqlResult<String> {
    let spec = request
        .pivot
        .as_ref()
        .ok_or_else(|| CrossqlError::malformed("pivot discovery without a PivotSpec"))?;
    let pivot_line = request
        .role_line(LineRole::PivotColumn)
        .ok_or_else(|| CrossqlError::malformed("pivot discovery without a PivotColumn line"))?;

    let top = syntax.top_x(Some(spec.max_columns as u32), None);
    let mut sql = String::from("SELECT ");
    if let Some(t) = &top {
        if t.placement == TopPlacement::InlineAfterSelect {
            sql.push_str(&t.clause);
        }
    }
    sql.push_str(&format!(
        "{} AS pivot_value, COUNT(*) AS frequency {}{} GROUP BY {} ORDER BY COUNT(*) DESC",
        pivot_line.text,
        from_clause(request),
        where_clause(request),
        pivot_line.text,
    ));
    if let Some(t) = &top {
        if t.placement == TopPlacement::TrailingClause {
            sql.push_str(&t.clause);
        }
    }
    Ok(sql)
}

/// One `SUM(CASE WHEN <key> = '<value>' THEN <agg> ELSE 0 END) AS <alias>`
/// output column per selected pivot value.
fn pivot_case_columns(
    values: &[&PivotValue],
    key: &str,
    agg: &str,
    syntax: &dyn SqlSyntax,
) -> Vec<String> {
    values
        .iter()
        .map(|v| {
            format!(
                "SUM(CASE WHEN {} = {} THEN {} ELSE 0 END) AS {}",
                key,
                syntax.string_literal(&v.value),
                agg,
                syntax.wrap_identifier(&v.value),
            )
        })
        .collect()
}

fn selected_values<'a>(spec: &'a PivotSpec) -> CrossqlResult<Vec<&'a PivotValue>> {
    let values = select_top_values(spec);
    if values.is_empty() {
        return Err(CrossqlError::malformed(
            "pivot value list is empty; run the discovery query first",
        ));
    }
    Ok(values)
}

/// Pivot-only: the Basic aggregate (grouped by the non-pivot columns plus
/// the pivot column) wrapped in an outer SELECT that folds pivot rows into
/// CASE columns. Non-pivot group columns surface as `grp_1..grp_n`; OrderBy
/// lines address those aliases.
pub fn build_pivot_only(
    request: &AggregateRequest,
    syntax: &dyn SqlSyntax,
    _dates: &dyn AggregateDialect,
) -> CrossqlResult<String> {
    let spec = request
        .pivot
        .as_ref()
        .ok_or_else(|| CrossqlError::malformed("pivot shape without a PivotSpec"))?;
    let pivot_line = request
        .role_line(LineRole::PivotColumn)
        .ok_or_else(|| CrossqlError::malformed("pivot shape without a PivotColumn line"))?;
    let count_line = request
        .role_line(LineRole::CountExpression)
        .ok_or_else(|| CrossqlError::malformed("pivot shape without a CountExpression line"))?;
    let values = selected_values(spec)?;

    let top = syntax.top_x(request.limit, request.offset);
    let order_texts = component_texts(request, QueryComponent::OrderBy);
    if let Some(t) = &top {
        if t.requires_order_by && order_texts.is_empty() {
            return Err(CrossqlError::MissingOrderBy {
                dialect: syntax.dialect(),
            });
        }
    }

    let groups: Vec<&str> = request
        .component(QueryComponent::GroupBy)
        .filter(|l| !l.has_role(LineRole::PivotColumn))
        .map(|l| l.text.as_str())
        .collect();

    // Inner: the plain aggregate, pivot column included in the grouping.
    let mut inner_select: Vec<String> = groups
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{} AS grp_{}", text, i + 1))
        .collect();
    inner_select.push(format!("{} AS pivot_value", pivot_line.text));
    inner_select.push(format!("{} AS agg_value", count_line.text));

    let mut inner_group: Vec<&str> = groups.clone();
    inner_group.push(&pivot_line.text);

    let inner = format!(
        "SELECT {} {}{} GROUP BY {}{}",
        inner_select.join(", "),
        from_clause(request),
        where_clause(request),
        inner_group.join(", "),
        having_clause(request),
    );

    let mut outer_cols: Vec<String> = (1..=groups.len()).map(|i| format!("grp_{}", i)).collect();
    outer_cols.extend(pivot_case_columns(&values, "pivot_value", "agg_value", syntax));

    let mut sql = String::from("SELECT ");
    if let Some(t) = &top {
        if t.placement == TopPlacement::InlineAfterSelect {
            sql.push_str(&t.clause);
        }
    }
    sql.push_str(&outer_cols.join(", "));
    sql.push_str(&format!(
        " FROM ({}) {}",
        inner,
        syntax.table_alias("pivot_source")
    ));
    if !groups.is_empty() {
        let outer_group: Vec<String> = (1..=groups.len()).map(|i| format!("grp_{}", i)).collect();
        sql.push_str(" GROUP BY ");
        sql.push_str(&outer_group.join(", "));
    }
    if !order_texts.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_texts.join(", "));
    }
    if let Some(t) = &top {
        if t.placement == TopPlacement::TrailingClause {
            sql.push_str(&t.clause);
        }
    }
    sql.push_str(&postfix_lines(request));

    Ok(sql)
}

/// Pivot-and-axis: the spine LEFT JOINed against the pivot aggregate keyed
/// by the shared bucket expression. Unmatched spine rows carry NULLs, which
/// the CASE arms turn into zeros — every bucket shows every pivot column.
pub fn build_pivot_axis(
    request: &AggregateRequest,
    syntax: &dyn SqlSyntax,
    dates: &dyn AggregateDialect,
) -> CrossqlResult<String> {
    let spec = request
        .axis
        .ok_or_else(|| CrossqlError::malformed("pivot-and-axis shape without an AxisSpec"))?;
    let pivot_spec = request
        .pivot
        .as_ref()
        .ok_or_else(|| CrossqlError::malformed("pivot-and-axis shape without a PivotSpec"))?;
    let axis_line = request
        .role_line(LineRole::AxisColumn)
        .ok_or_else(|| CrossqlError::malformed("pivot-and-axis shape without an AxisColumn line"))?;
    let pivot_line = request
        .role_line(LineRole::PivotColumn)
        .ok_or_else(|| CrossqlError::malformed("pivot-and-axis shape without a PivotColumn line"))?;
    let count_line = request
        .role_line(LineRole::CountExpression)
        .ok_or_else(|| CrossqlError::malformed("pivot-and-axis shape without a CountExpression line"))?;
    let values = selected_values(pivot_spec)?;

    let spine_bucket = dates.bucket_expr("bucket_date", spec.increment);
    let data_bucket = dates.bucket_expr(&axis_line.text, spec.increment);
    let bucket_select = if spec.increment == Increment::Year {
        syntax.cast_expr(&spine_bucket, LogicalType::Int)?
    } else {
        spine_bucket.clone()
    };

    let inner = format!(
        "SELECT {} AS axis_bucket, {} AS pivot_value, {} AS agg_value {}{} GROUP BY {}, {}{}",
        data_bucket,
        pivot_line.text,
        count_line.text,
        from_clause(request),
        where_clause(request),
        data_bucket,
        pivot_line.text,
        having_clause(request),
    );

    let mut cols = vec![format!("{} AS bucket", bucket_select)];
    cols.extend(pivot_case_columns(
        &values,
        "axis_data.pivot_value",
        "axis_data.agg_value",
        syntax,
    ));

    let top = syntax.top_x(request.limit, request.offset);
    let mut head = String::from("SELECT ");
    if let Some(t) = &top {
        if t.placement == TopPlacement::InlineAfterSelect {
            head.push_str(&t.clause);
        }
    }

    let mut sql = format!(
        "{} {}{} FROM calendar_axis LEFT JOIN ({}) {} ON {} = axis_data.axis_bucket GROUP BY {} ORDER BY MIN(bucket_date) ASC",
        dates.spine_with_clause(&spec),
        head,
        cols.join(", "),
        inner,
        syntax.table_alias("axis_data"),
        spine_bucket,
        spine_bucket,
    );
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
