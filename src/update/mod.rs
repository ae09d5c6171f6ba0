//! Cross-table UPDATE compilation.
//!
//! One logical request, three physical strategies, chosen per dialect at
//! compile time: an EXISTS subquery where the dialect has no multi-table
//! UPDATE at all, `UPDATE ... FROM` where it does, and a native join where
//! the dialect puts the join before SET. Qualifiers (`Target`/`Source`)
//! resolve to alias or table text only at emission, so there is no `t1.`
//! string substitution anywhere.

pub mod params;


use tracing::debug;

pub use params::{BoundParam, CompiledUpdate, ParamContext};

use crate::dialect::Dialect;
use crate::error::{CrossqlError, CrossqlResult};
use crate::model::{
    Assignment, JoinPredicate, QualifiedColumn, Qualifier, UpdateRequest, UpdateValue, Value,
};
use crate::syntax::SqlSyntax;

/// The physical form a dialect supports for a two-table UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// `UPDATE target SET ... WHERE EXISTS (SELECT 1 FROM source t2 ...)`,
    /// with correlated scalar subqueries for source-referencing assignments.
    ExistsSubquery,
    /// `UPDATE target AS t1 SET ... FROM source AS t2 WHERE ...`
    UpdateFrom,
    /// `UPDATE target AS t1 JOIN source AS t2 ON ... SET ...`
    NativeJoin,
}

/// How `Qualifier::Target` spells itself in the emitted SQL.
#[derive(Clone, Copy, PartialEq)]
enum TargetStyle {
    /// `t1.` — the target carries an alias.
    Alias,
    /// The quoted table name — the dialect forbids aliasing the update
    /// target, so correlation goes through the name itself.
    TableName,
}

struct EmitContext<'a> {
    syntax: &'a dyn SqlSyntax,
    target_style: TargetStyle,
    target_table: &'a str,
}

impl EmitContext<'_> {
    fn column(&self, col: &QualifiedColumn) -> String {
        let name = self.syntax.wrap_identifier(&col.name);
        match col.qualifier {
            None => name,
            Some(Qualifier::Source) => format!("t2.{}", name),
            Some(Qualifier::Target) => match self.target_style {
                TargetStyle::Alias => format!("t1.{}", name),
                TargetStyle::TableName => {
                    format!("{}.{}", self.syntax.wrap_identifier(self.target_table), name)
                }
            },
        }
    }

    fn value(&self, value: &UpdateValue, params: &mut ParamContext) -> String {
        match value {
            UpdateValue::Column(col) => self.column(col),
            UpdateValue::Literal(Value::Null) => "NULL".to_string(),
            UpdateValue::Literal(v) => params.bind(v.clone(), self.syntax),
        }
    }

    fn predicate(&self, p: &JoinPredicate, params: &mut ParamContext) -> String {
        format!(
            "{} {} {}",
            self.column(&p.left),
            p.op.sql_symbol(),
            self.value(&p.right, params)
        )
    }

    fn predicates(&self, preds: &[JoinPredicate], params: &mut ParamContext) -> String {
        preds
            .iter()
            .map(|p| self.predicate(p, params))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

fn validate(request: &UpdateRequest) -> CrossqlResult<()> {
    if request.assignments.is_empty() {
        return Err(CrossqlError::malformed("update request has no assignments"));
    }
    if request.joins.is_empty() {
        return Err(CrossqlError::malformed(
            "update request has no join predicates",
        ));
    }
    Ok(())
}

/// Compile a cross-table update for the given dialect strategy.
pub fn build_update(
    request: &UpdateRequest,
    syntax: &dyn SqlSyntax,
    strategy: UpdateStrategy,
) -> CrossqlResult<CompiledUpdate> {
    validate(request)?;
    debug!(dialect = %syntax.dialect(), ?strategy, "compiling cross-table update");
    match strategy {
        UpdateStrategy::ExistsSubquery => build_exists(request, syntax),
        UpdateStrategy::UpdateFrom => match syntax.dialect() {
            Dialect::SqlServer => build_from_join(request, syntax),
            _ => build_update_from(request, syntax),
        },
        UpdateStrategy::NativeJoin => build_native_join(request, syntax),
    }
}

/// Assignments as `col = expr`, LHS always bare.
fn set_clause(
    request: &UpdateRequest,
    ctx: &EmitContext<'_>,
    params: &mut ParamContext,
) -> String {
    request
        .assignments
        .iter()
        .map(|a| {
            format!(
                "{} = {}",
                ctx.syntax.wrap_identifier(&a.column),
                ctx.value(&a.value, params)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// PostgreSQL / SQLite: `UPDATE t AS t1 SET ... FROM s AS t2 WHERE joins
/// [AND (filters)]`.
fn build_update_from(
    request: &UpdateRequest,
    syntax: &dyn SqlSyntax,
) -> CrossqlResult<CompiledUpdate> {
    let ctx = EmitContext {
        syntax,
        target_style: TargetStyle::Alias,
        target_table: &request.target,
    };
    let mut params = ParamContext::new();

    let set = set_clause(request, &ctx, &mut params);
    let joins = ctx.predicates(&request.joins, &mut params);

    let mut sql = format!(
        "UPDATE {} {} SET {} FROM {} {} WHERE {}",
        syntax.wrap_identifier(&request.target),
        syntax.table_alias("t1"),
        set,
        syntax.wrap_identifier(&request.source),
        syntax.table_alias("t2"),
        joins,
    );
    if !request.filters.is_empty() {
        let filters = ctx.predicates(&request.filters, &mut params);
        sql.push_str(&format!(" AND ({})", filters));
    }

    Ok(CompiledUpdate {
        sql,
        params: params.into_params(),
    })
}

/// SQL Server: the update target is the alias itself, joined in the FROM.
fn build_from_join(
    request: &UpdateRequest,
    syntax: &dyn SqlSyntax,
) -> CrossqlResult<CompiledUpdate> {
    let ctx = EmitContext {
        syntax,
        target_style: TargetStyle::Alias,
        target_table: &request.target,
    };
    let mut params = ParamContext::new();

    let set = set_clause(request, &ctx, &mut params);
    let joins = ctx.predicates(&request.joins, &mut params);

    let mut sql = format!(
        "UPDATE t1 SET {} FROM {} {} INNER JOIN {} {} ON {}",
        set,
        syntax.wrap_identifier(&request.target),
        syntax.table_alias("t1"),
        syntax.wrap_identifier(&request.source),
        syntax.table_alias("t2"),
        joins,
    );
    if !request.filters.is_empty() {
        let filters = ctx.predicates(&request.filters, &mut params);
        sql.push_str(&format!(" WHERE {}", filters));
    }

    Ok(CompiledUpdate {
        sql,
        params: params.into_params(),
    })
}

/// MySQL: join first, SET after.
fn build_native_join(
    request: &UpdateRequest,
    syntax: &dyn SqlSyntax,
) -> CrossqlResult<CompiledUpdate> {
    let ctx = EmitContext {
        syntax,
        target_style: TargetStyle::Alias,
        target_table: &request.target,
    };
    let mut params = ParamContext::new();

    let joins = ctx.predicates(&request.joins, &mut params);
    let set = set_clause(request, &ctx, &mut params);

    let mut sql = format!(
        "UPDATE {} {} INNER JOIN {} {} ON {} SET {}",
        syntax.wrap_identifier(&request.target),
        syntax.table_alias("t1"),
        syntax.wrap_identifier(&request.source),
        syntax.table_alias("t2"),
        joins,
        set,
    );
    if !request.filters.is_empty() {
        let filters = ctx.predicates(&request.filters, &mut params);
        sql.push_str(&format!(" WHERE {}", filters));
    }

    Ok(CompiledUpdate {
        sql,
        params: params.into_params(),
    })
}

/// Oracle: no alias on the update target; source-referencing assignments
/// become correlated scalar subqueries, row selection a WHERE EXISTS. The
/// join predicates must identify at most one source row per target row —
/// that is the caller's contract, as with any correlated-subquery update.
fn build_exists(request: &UpdateRequest, syntax: &dyn SqlSyntax) -> CrossqlResult<CompiledUpdate> {
    let ctx = EmitContext {
        syntax,
        target_style: TargetStyle::TableName,
        target_table: &request.target,
    };
    let mut params = ParamContext::new();

    let source = syntax.wrap_identifier(&request.source);
    let source_alias = syntax.table_alias("t2");

    let correlated = |params: &mut ParamContext| -> String {
        let mut preds = ctx.predicates(&request.joins, params);
        if !request.filters.is_empty() {
            preds.push_str(&format!(
                " AND ({})",
                ctx.predicates(&request.filters, params)
            ));
        }
        preds
    };

    let set = request
        .assignments
        .iter()
        .map(|a: &Assignment| {
            let lhs = syntax.wrap_identifier(&a.column);
            let rhs = match &a.value {
                UpdateValue::Column(col) if col.qualifier == Some(Qualifier::Source) => {
                    format!(
                        "(SELECT {} FROM {} {} WHERE {})",
                        ctx.column(col),
                        source,
                        source_alias,
                        correlated(&mut params),
                    )
                }
                other => ctx.value(other, &mut params),
            };
            format!("{} = {}", lhs, rhs)
        })
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE {} SET {} WHERE EXISTS (SELECT 1 FROM {} {} WHERE {})",
        syntax.wrap_identifier(&request.target),
        set,
        source,
        source_alias,
        correlated(&mut params),
    );

    Ok(CompiledUpdate {
        sql,
        params: params.into_params(),
    })
}
