use serde::{Deserialize, Serialize};

use crate::model::Value;

/// Which side of a two-table update a column belongs to.
///
/// Qualifiers resolve to final text (`t1`, `t2`, or the quoted target table
/// name on dialects that forbid aliasing the update target) only at emission
/// time; nothing in the request carries alias text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualifier {
    /// The table being updated.
    Target,
    /// The table driving the update.
    Source,
}

/// A column reference with an optional table qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedColumn {
    #[serde(default)]
    pub qualifier: Option<Qualifier>,
    pub name: String,
}

impl QualifiedColumn {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn target(name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(Qualifier::Target),
            name: name.into(),
        }
    }

    pub fn source(name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(Qualifier::Source),
            name: name.into(),
        }
    }
}

/// Right-hand side of an assignment or predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpdateValue {
    /// A column reference, qualifier preserved through emission.
    Column(QualifiedColumn),
    /// A literal, emitted as a bound parameter (NULL stays inline).
    Literal(Value),
}

/// One `column = expression` assignment. The left-hand side is always a bare
/// column name in the emitted SQL, whatever the dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: UpdateValue,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: UpdateValue) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }

    /// Assign from a source-table column.
    pub fn from_source(column: impl Into<String>, source_column: impl Into<String>) -> Self {
        Self::new(
            column,
            UpdateValue::Column(QualifiedColumn::source(source_column)),
        )
    }

    /// Assign a literal.
    pub fn literal(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, UpdateValue::Literal(value.into()))
    }
}

/// Comparison operator for join and filter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// One predicate joining or filtering the two tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left: QualifiedColumn,
    pub op: CompareOp,
    pub right: UpdateValue,
}

impl JoinPredicate {
    pub fn new(left: QualifiedColumn, op: CompareOp, right: UpdateValue) -> Self {
        Self { left, op, right }
    }

    /// Equality between a target column and a source column, the common join.
    pub fn on_columns(target_column: impl Into<String>, source_column: impl Into<String>) -> Self {
        Self::new(
            QualifiedColumn::target(target_column),
            CompareOp::Eq,
            UpdateValue::Column(QualifiedColumn::source(source_column)),
        )
    }
}

/// A two-table UPDATE driven by a JOIN-like condition.
///
/// `target == source` is a self-join; aliases (or the subquery correlation on
/// dialects without aliases) keep the two mentions distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub target: String,
    pub source: String,
    pub joins: Vec<JoinPredicate>,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub filters: Vec<JoinPredicate>,
}

impl UpdateRequest {
    pub fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
            joins: Vec::new(),
            assignments: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn join(mut self, predicate: JoinPredicate) -> Self {
        self.joins.push(predicate);
        self
    }

    pub fn set(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn filter(mut self, predicate: JoinPredicate) -> Self {
        self.filters.push(predicate);
        self
    }
}
