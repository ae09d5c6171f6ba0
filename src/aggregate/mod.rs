//! Aggregate query compilation.
//!
//! Four shapes, selected purely by which sub-structures the request carries:
//!
//! | pivot | axis | shape          |
//! |-------|------|----------------|
//! | no    | no   | Basic          |
//! | no    | yes  | Axis-only      |
//! | yes   | no   | Pivot-only     |
//! | yes   | yes  | Pivot-and-axis |

pub mod axis;
pub mod dates;
pub mod pivot;

#[cfg(test)]
mod tests;

use tracing::debug;

pub use dates::AggregateDialect;

use crate::error::{CrossqlError, CrossqlResult};
use crate::model::{AggregateRequest, LineRole, QueryComponent};
use crate::syntax::{SqlSyntax, TopPlacement};

/// The four aggregate query shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateShape {
    Basic,
    AxisOnly,
    PivotOnly,
    PivotAndAxis,
}

impl AggregateShape {
    /// Shape selection is a pure function of the request's sub-structures.
    pub fn of(request: &AggregateRequest) -> Self {
        match (request.pivot.is_some(), request.axis.is_some()) {
            (false, false) => AggregateShape::Basic,
            (false, true) => AggregateShape::AxisOnly,
            (true, false) => AggregateShape::PivotOnly,
            (true, true) => AggregateShape::PivotAndAxis,
        }
    }
}

impl std::fmt::Display for AggregateShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateShape::Basic => write!(f, "basic"),
            AggregateShape::AxisOnly => write!(f, "axis-only"),
            AggregateShape::PivotOnly => write!(f, "pivot-only"),
            AggregateShape::PivotAndAxis => write!(f, "pivot-and-axis"),
        }
    }
}

/// Compile an aggregate request to one SQL string for the given dialect.
pub fn build_aggregate(
    request: &AggregateRequest,
    syntax: &dyn SqlSyntax,
    dates: &dyn AggregateDialect,
) -> CrossqlResult<String> {
    let shape = validate(request, dates)?;
    debug!(dialect = %syntax.dialect(), shape = %shape, "compiling aggregate query");
    match shape {
        AggregateShape::Basic => build_basic(request, syntax),
        AggregateShape::AxisOnly => axis::build_axis_only(request, syntax, dates),
        AggregateShape::PivotOnly => pivot::build_pivot_only(request, syntax, dates),
        AggregateShape::PivotAndAxis => pivot::build_pivot_axis(request, syntax, dates),
    }
}

/// Check the request's well-formedness invariants and the dialect's
/// capability flags. All failures surface here, before any SQL is emitted.
fn validate(
    request: &AggregateRequest,
    dates: &dyn AggregateDialect,
) -> CrossqlResult<AggregateShape> {
    let shape = AggregateShape::of(request);

    match request.role_count(LineRole::CountExpression) {
        1 => {}
        0 => {
            return Err(CrossqlError::malformed(
                "aggregate request carries no CountExpression line",
            ))
        }
        n => {
            return Err(CrossqlError::malformed(format!(
                "aggregate request carries {} CountExpression lines, expected exactly one",
                n
            )))
        }
    }
    if request.role_count(LineRole::PivotColumn) > 1 {
        return Err(CrossqlError::malformed(
            "aggregate request carries more than one PivotColumn line",
        ));
    }
    if request.component(QueryComponent::From).next().is_none() {
        return Err(CrossqlError::malformed("aggregate request has no From line"));
    }

    if request.pivot.is_some() && request.role_count(LineRole::PivotColumn) == 0 {
        return Err(CrossqlError::malformed(
            "pivot requested but no line carries the PivotColumn role",
        ));
    }

    if request.axis.is_some() {
        if request.role_count(LineRole::AxisColumn) != 1 {
            return Err(CrossqlError::malformed(
                "axis requested but no single line carries the AxisColumn role",
            ));
        }
        // Axis shapes group by the calendar bucket (plus the pivot column in
        // the combined shape); anything else would punch holes in the dense
        // spine join.
        let extra = request
            .component(QueryComponent::GroupBy)
            .filter(|l| !l.has_role(LineRole::AxisColumn) && !l.has_role(LineRole::PivotColumn))
            .count();
        if extra > 0 {
            return Err(CrossqlError::malformed(
                "axis queries cannot carry additional GroupBy lines",
            ));
        }
        if request.component(QueryComponent::OrderBy).next().is_some() {
            return Err(CrossqlError::malformed(
                "axis queries are ordered by the calendar spine; OrderBy lines are not allowed",
            ));
        }
    }

    match shape {
        AggregateShape::PivotOnly if !dates.supports_pivot() => {
            Err(CrossqlError::UnsupportedPivot {
                dialect: dates.dialect(),
                shape,
            })
        }
        AggregateShape::PivotAndAxis if !dates.supports_pivot_axis() => {
            Err(CrossqlError::UnsupportedPivot {
                dialect: dates.dialect(),
                shape,
            })
        }
        _ => Ok(shape),
    }
}

/// Lines of one component, as raw text in caller order.
pub(crate) fn component_texts(request: &AggregateRequest, component: QueryComponent) -> Vec<&str> {
    request
        .component(component)
        .map(|l| l.text.as_str())
        .collect()
}

/// `FROM x[, y] [join fragments]`
pub(crate) fn from_clause(request: &AggregateRequest) -> String {
    let mut sql = format!(
        "FROM {}",
        component_texts(request, QueryComponent::From).join(", ")
    );
    for join in request.component(QueryComponent::JoinInfoJoin) {
        sql.push(' ');
        sql.push_str(&join.text);
    }
    sql
}

/// ` WHERE a AND b`, or empty.
pub(crate) fn where_clause(request: &AggregateRequest) -> String {
    let predicates = component_texts(request, QueryComponent::Where);
    if predicates.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", predicates.join(" AND "))
    }
}

/// ` HAVING a AND b`, or empty.
pub(crate) fn having_clause(request: &AggregateRequest) -> String {
    let predicates = component_texts(request, QueryComponent::Having);
    if predicates.is_empty() {
        String::new()
    } else {
        format!(" HAVING {}", predicates.join(" AND "))
    }
}

/// Caller-supplied statement tail (Postfix lines), space-prefixed.
pub(crate) fn postfix_lines(request: &AggregateRequest) -> String {
    let mut sql = String::new();
    for line in request.component(QueryComponent::Postfix) {
        sql.push(' ');
        sql.push_str(&line.text);
    }
    sql
}

/// The Basic shape: lines concatenated in component order, TOP-X spliced or
/// appended per the dialect's placement rule.
fn build_basic(request: &AggregateRequest, syntax: &dyn SqlSyntax) -> CrossqlResult<String> {
    let top = syntax.top_x(request.limit, request.offset);
    if let Some(t) = &top {
        let has_order_by = request.component(QueryComponent::OrderBy).next().is_some();
        if t.requires_order_by && !has_order_by {
            return Err(CrossqlError::MissingOrderBy {
                dialect: syntax.dialect(),
            });
        }
    }

    let mut select_list = component_texts(request, QueryComponent::Select);
    let group_texts = component_texts(request, QueryComponent::GroupBy);
    select_list.extend(&group_texts);

    let mut sql = String::from("SELECT ");
    if let Some(t) = &top {
        if t.placement == TopPlacement::InlineAfterSelect {
            sql.push_str(&t.clause);
        }
    }
    sql.push_str(&select_list.join(", "));
    sql.push(' ');
    sql.push_str(&from_clause(request));
    sql.push_str(&where_clause(request));

    if !group_texts.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&group_texts.join(", "));
    }
    sql.push_str(&having_clause(request));

    let order_texts = component_texts(request, QueryComponent::OrderBy);
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
