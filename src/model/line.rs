use serde::{Deserialize, Serialize};

/// The clause a line of SQL text physically belongs to.
///
/// Placement is purely positional: the compiler assembles lines of the same
/// component in caller order, with component-appropriate separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryComponent {
    /// SELECT list entry
    Select,
    /// FROM source (table or derived table text)
    From,
    /// WHERE predicate fragment (AND-joined)
    Where,
    /// GROUP BY expression (also echoed into the SELECT list)
    GroupBy,
    /// HAVING predicate fragment (AND-joined)
    Having,
    /// ORDER BY entry
    OrderBy,
    /// JOIN clause fragment appended after FROM
    JoinInfoJoin,
    /// UPDATE SET fragment
    Set,
    /// Trailing text appended after everything else
    Postfix,
}

/// Cross-cutting semantic meaning of a line, independent of its placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRole {
    /// The line is the aggregate expression (COUNT, SUM, ...). Exactly one
    /// per well-formed aggregate request.
    CountExpression,
    /// The line's distinct values become output columns. At most one.
    PivotColumn,
    /// The line is the date expression a calendar axis buckets on.
    AxisColumn,
    /// The line carries the ordering that backs a TOP-X request.
    TopXOrdering,
}

/// A fragment of SQL text tagged with where it belongs and, optionally,
/// what it means.
///
/// Lines are immutable value objects owned by the caller; the compiler only
/// reads them. Identifier resolution and quoting inside the text is the
/// caller's responsibility (names arrive already resolved).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Raw SQL text of the fragment.
    pub text: String,
    /// Which clause the text belongs in.
    pub component: QueryComponent,
    /// Optional semantic tag.
    #[serde(default)]
    pub role: Option<LineRole>,
}

impl Line {
    /// Create an untagged line.
    pub fn new(text: impl Into<String>, component: QueryComponent) -> Self {
        Self {
            text: text.into(),
            component,
            role: None,
        }
    }

    /// Create a line with a semantic role.
    pub fn with_role(text: impl Into<String>, component: QueryComponent, role: LineRole) -> Self {
        Self {
            text: text.into(),
            component,
            role: Some(role),
        }
    }

    /// Whether this line carries the given role.
    pub fn has_role(&self, role: LineRole) -> bool {
        self.role == Some(role)
    }
}
