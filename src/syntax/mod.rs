//! Per-dialect syntax rules: identifier quoting, parameterization, literal
//! escaping, scalar-function translation and the TOP-X strategy.

pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

pub use mysql::MySqlSyntax;
pub use oracle::OracleSyntax;
pub use postgres::PostgresSyntax;
pub use sqlite::SqliteSyntax;
pub use sqlserver::SqlServerSyntax;

use crate::dialect::Dialect;
use crate::error::CrossqlResult;
use crate::model::LogicalType;

/// A logical scalar function call, translated per dialect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarFunc<'a> {
    Left { expr: &'a str, len: u32 },
    Right { expr: &'a str, len: u32 },
    Substring { expr: &'a str, start: u32, len: u32 },
    Now,
    StringLength { expr: &'a str },
    NewGuid,
    Md5 { expr: &'a str },
}

impl ScalarFunc<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarFunc::Left { .. } => "left",
            ScalarFunc::Right { .. } => "right",
            ScalarFunc::Substring { .. } => "substring",
            ScalarFunc::Now => "now",
            ScalarFunc::StringLength { .. } => "string-length",
            ScalarFunc::NewGuid => "new-guid",
            ScalarFunc::Md5 { .. } => "md5",
        }
    }
}

/// Where a dialect's row-limiting clause goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopPlacement {
    /// Spliced immediately after the SELECT keyword (`SELECT TOP n ...`).
    InlineAfterSelect,
    /// Appended after ORDER BY (`... LIMIT n OFFSET m`).
    TrailingClause,
}

/// A dialect's rendering of a limit/offset request.
#[derive(Debug, Clone, PartialEq)]
pub struct TopX {
    /// Clause text. Inline text carries its own trailing space; trailing
    /// text carries its own leading space.
    pub clause: String,
    pub placement: TopPlacement,
    /// Whether the dialect's grammar demands an ORDER BY alongside this
    /// clause. Enforced by the compilers, never worked around.
    pub requires_order_by: bool,
}

/// Per-dialect syntax rules. Implementations are stateless unit structs,
/// safe to share across threads.
pub trait SqlSyntax: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Apply the dialect's quoting characters, escaping embedded quote
    /// characters by the dialect's doubling rule. Idempotent: an
    /// already-wrapped identifier passes through unchanged.
    fn wrap_identifier(&self, name: &str) -> String;

    /// The character introducing a bound parameter (`@`, `:`, `?`, `$`).
    fn parameter_prefix(&self) -> &'static str;

    /// Placeholder text for the 1-based parameter at `index`.
    fn placeholder(&self, index: usize) -> String;

    /// Double single quotes for an inline string literal.
    fn escape_literal(&self, text: &str) -> String {
        text.replace('\'', "''")
    }

    /// A quoted, escaped string literal.
    fn string_literal(&self, text: &str) -> String {
        format!("'{}'", self.escape_literal(text))
    }

    /// Translate a logical scalar function into the dialect's expression.
    fn scalar_function(&self, func: &ScalarFunc<'_>) -> CrossqlResult<String>;

    /// Dialect type text for a logical type.
    fn type_name(&self, ty: LogicalType) -> CrossqlResult<&'static str>;

    /// A CAST through the type-translation contract.
    fn cast_expr(&self, expr: &str, ty: LogicalType) -> CrossqlResult<String> {
        Ok(format!("CAST({} AS {})", expr, self.type_name(ty)?))
    }

    /// The inverse translation: the logical type behind a dialect type
    /// string, or None when the text maps to nothing this crate models.
    fn logical_type_of(&self, type_text: &str) -> Option<LogicalType>;

    /// The dialect's row-limiting clause, or None when neither limit nor
    /// offset is requested.
    fn top_x(&self, limit: Option<u32>, offset: Option<u32>) -> Option<TopX>;

    /// Alias text for a derived table (`AS name`, or bare `name` on
    /// dialects that reject the keyword).
    fn table_alias(&self, alias: &str) -> String {
        format!("AS {}", alias)
    }
}

/// Shared idempotence check for `wrap_identifier`.
pub(crate) fn already_wrapped(name: &str, open: char, close: char) -> bool {
    name.len() >= 2 && name.starts_with(open) && name.ends_with(close)
}

/// Uppercased base name of a type string: precision/scale arguments dropped.
pub(crate) fn base_type(type_text: &str) -> String {
    type_text
        .split('(')
        .next()
        .unwrap_or(type_text)
        .trim()
        .to_ascii_uppercase()
}
