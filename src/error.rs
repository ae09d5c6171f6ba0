//! Error types for crossql.

use thiserror::Error;

use crate::aggregate::AggregateShape;
use crate::dialect::Dialect;
use crate::model::LogicalType;

/// The main error type for crossql compilation.
///
/// Every variant is detected before any SQL is returned, and the same
/// request against the same dialect always fails the same way. Nothing here
/// is worth retrying: compilation is a pure function of its input.
#[derive(Debug, Error)]
pub enum CrossqlError {
    /// Axis increment name outside the closed set (day, month, quarter, year).
    #[error("Invalid axis increment: '{0}'. Expected: day, month, quarter, or year")]
    InvalidIncrement(String),

    /// Trailing-clause paging was requested on a dialect that demands an
    /// ORDER BY, and the request carries no OrderBy line. Never auto-corrected:
    /// injecting an arbitrary ordering would change result semantics.
    #[error("{dialect} paging requires an ORDER BY line when a limit or offset is requested")]
    MissingOrderBy { dialect: Dialect },

    /// The requested aggregate shape has no expression in this dialect.
    #[error("{dialect} cannot express the {shape} aggregate shape")]
    UnsupportedPivot {
        dialect: Dialect,
        shape: AggregateShape,
    },

    /// The dialect has no equivalent for a logical scalar function.
    #[error("{dialect} has no equivalent for scalar function {function}")]
    UnsupportedFunction {
        dialect: Dialect,
        function: &'static str,
    },

    /// The type-translation contract has no mapping for this logical type.
    #[error("{dialect} has no type mapping for {logical_type}")]
    TypeNotMapped {
        dialect: Dialect,
        logical_type: LogicalType,
    },

    /// The request violates a well-formedness invariant (count expression
    /// cardinality, pivot/axis line tagging, empty pivot value list).
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Dialect name outside the registry's closed set.
    #[error("Unknown dialect: '{0}'")]
    UnknownDialect(String),
}

impl CrossqlError {
    /// Create a malformed-request error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRequest(reason.into())
    }
}

/// Result type alias for crossql operations.
pub type CrossqlResult<T> = Result<T, CrossqlError>;
