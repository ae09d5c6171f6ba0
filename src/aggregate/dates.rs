//! Per-dialect calendar primitives backing the axis shapes.
//!
//! The one rule that matters: the spine side and the data side of an axis
//! join must use the *same* bucket-extraction expression, character for
//! character. If the two sides truncate differently the LEFT JOIN silently
//! matches nothing.

use chrono::NaiveDate;

use crate::dialect::Dialect;
use crate::model::{AxisSpec, Increment};

/// Per-dialect aggregate-compilation strategy: date literals, bucket
/// extraction, spine generation and shape capability flags.
///
/// Implementations are stateless unit structs, safe to share across threads.
pub trait AggregateDialect: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// A date literal in the dialect's preferred spelling.
    fn date_literal(&self, date: NaiveDate) -> String;

    /// Truncate a date expression to its bucket label. Used verbatim on both
    /// sides of the axis join.
    fn bucket_expr(&self, expr: &str, increment: Increment) -> String;

    /// Advance a date expression by one increment. Quarter steps are
    /// synthesized as three months everywhere.
    fn spine_step(&self, expr: &str, increment: Increment) -> String;

    /// The full `WITH ...` clause producing the spine CTE `calendar_axis`
    /// with its single column `bucket_date`.
    fn spine_with_clause(&self, spec: &AxisSpec) -> String;

    /// Statement-level text some dialects need after a recursive spine.
    fn spine_postfix(&self) -> Option<&'static str> {
        None
    }

    fn supports_pivot(&self) -> bool {
        true
    }

    fn supports_pivot_axis(&self) -> bool {
        true
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub struct SqlServerAggregate;

impl AggregateDialect for SqlServerAggregate {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn date_literal(&self, date: NaiveDate) -> String {
        format!("CONVERT(date, '{}')", iso(date))
    }

    fn bucket_expr(&self, expr: &str, increment: Increment) -> String {
        match increment {
            // Style 23 is yyyy-mm-dd; shorter targets truncate from the left.
            Increment::Day => format!("CONVERT(varchar(10), {}, 23)", expr),
            Increment::Month => format!("CONVERT(varchar(7), {}, 23)", expr),
            Increment::Quarter => {
                format!("CONCAT(YEAR({}), '-Q', DATEPART(QUARTER, {}))", expr, expr)
            }
            Increment::Year => format!("CONVERT(varchar(4), {}, 23)", expr),
        }
    }

    fn spine_step(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("DATEADD(DAY, 1, {})", expr),
            Increment::Month => format!("DATEADD(MONTH, 1, {})", expr),
            Increment::Quarter => format!("DATEADD(MONTH, 3, {})", expr),
            Increment::Year => format!("DATEADD(YEAR, 1, {})", expr),
        }
    }

    fn spine_with_clause(&self, spec: &AxisSpec) -> String {
        format!(
            "WITH calendar_axis (bucket_date) AS (SELECT {} UNION ALL SELECT {} FROM calendar_axis WHERE bucket_date < {})",
            self.date_literal(spec.start),
            self.spine_step("bucket_date", spec.increment),
            self.date_literal(spec.end),
        )
    }

    fn spine_postfix(&self) -> Option<&'static str> {
        // Default recursion cap is 100 rows; a daily axis outgrows it fast.
        Some("OPTION (MAXRECURSION 0)")
    }
}

pub struct MySqlAggregate;

impl AggregateDialect for MySqlAggregate {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn date_literal(&self, date: NaiveDate) -> String {
        format!("DATE '{}'", iso(date))
    }

    fn bucket_expr(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("DATE_FORMAT({}, '%Y-%m-%d')", expr),
            Increment::Month => format!("DATE_FORMAT({}, '%Y-%m')", expr),
            Increment::Quarter => format!("CONCAT(YEAR({}), '-Q', QUARTER({}))", expr, expr),
            Increment::Year => format!("DATE_FORMAT({}, '%Y')", expr),
        }
    }

    fn spine_step(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("DATE_ADD({}, INTERVAL 1 DAY)", expr),
            Increment::Month => format!("DATE_ADD({}, INTERVAL 1 MONTH)", expr),
            Increment::Quarter => format!("DATE_ADD({}, INTERVAL 3 MONTH)", expr),
            Increment::Year => format!("DATE_ADD({}, INTERVAL 1 YEAR)", expr),
        }
    }

    fn spine_with_clause(&self, spec: &AxisSpec) -> String {
        format!(
            "WITH RECURSIVE calendar_axis (bucket_date) AS (SELECT {} UNION ALL SELECT {} FROM calendar_axis WHERE bucket_date < {})",
            self.date_literal(spec.start),
            self.spine_step("bucket_date", spec.increment),
            self.date_literal(spec.end),
        )
    }
}

pub struct OracleAggregate;

impl AggregateDialect for OracleAggregate {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn date_literal(&self, date: NaiveDate) -> String {
        format!("TO_DATE('{}', 'YYYY-MM-DD')", iso(date))
    }

    fn bucket_expr(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("TO_CHAR({}, 'YYYY-MM-DD')", expr),
            Increment::Month => format!("TO_CHAR({}, 'YYYY-MM')", expr),
            Increment::Quarter => format!("TO_CHAR({}, 'YYYY-\"Q\"Q')", expr),
            Increment::Year => format!("TO_CHAR({}, 'YYYY')", expr),
        }
    }

    fn spine_step(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("{} + 1", expr),
            Increment::Month => format!("ADD_MONTHS({}, 1)", expr),
            Increment::Quarter => format!("ADD_MONTHS({}, 3)", expr),
            Increment::Year => format!("ADD_MONTHS({}, 12)", expr),
        }
    }

    fn spine_with_clause(&self, spec: &AxisSpec) -> String {
        // Oracle spells recursion without the RECURSIVE keyword, but the
        // column list on the CTE is mandatory.
        format!(
            "WITH calendar_axis (bucket_date) AS (SELECT {} FROM dual UNION ALL SELECT {} FROM calendar_axis WHERE bucket_date < {})",
            self.date_literal(spec.start),
            self.spine_step("bucket_date", spec.increment),
            self.date_literal(spec.end),
        )
    }

    fn supports_pivot_axis(&self) -> bool {
        false
    }
}

pub struct PostgresAggregate;

impl AggregateDialect for PostgresAggregate {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn date_literal(&self, date: NaiveDate) -> String {
        format!("DATE '{}'", iso(date))
    }

    fn bucket_expr(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("TO_CHAR({}, 'YYYY-MM-DD')", expr),
            Increment::Month => format!("TO_CHAR({}, 'YYYY-MM')", expr),
            Increment::Quarter => format!("TO_CHAR({}, 'YYYY-\"Q\"Q')", expr),
            Increment::Year => format!("TO_CHAR({}, 'YYYY')", expr),
        }
    }

    fn spine_step(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("{} + INTERVAL '1 day'", expr),
            Increment::Month => format!("{} + INTERVAL '1 month'", expr),
            Increment::Quarter => format!("{} + INTERVAL '3 months'", expr),
            Increment::Year => format!("{} + INTERVAL '1 year'", expr),
        }
    }

    fn spine_with_clause(&self, spec: &AxisSpec) -> String {
        // No recursion needed: generate_series is the native date-series
        // primitive.
        let step = match spec.increment {
            Increment::Day => "1 day",
            Increment::Month => "1 month",
            Increment::Quarter => "3 months",
            Increment::Year => "1 year",
        };
        format!(
            "WITH calendar_axis (bucket_date) AS (SELECT bucket_date FROM GENERATE_SERIES({}, {}, INTERVAL '{}') AS g(bucket_date))",
            self.date_literal(spec.start),
            self.date_literal(spec.end),
            step,
        )
    }
}

pub struct SqliteAggregate;

impl AggregateDialect for SqliteAggregate {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn date_literal(&self, date: NaiveDate) -> String {
        format!("DATE('{}')", iso(date))
    }

    fn bucket_expr(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("STRFTIME('%Y-%m-%d', {})", expr),
            Increment::Month => format!("STRFTIME('%Y-%m', {})", expr),
            // No quarter in strftime; derive it from the month number.
            Increment::Quarter => format!(
                "STRFTIME('%Y', {}) || '-Q' || ((CAST(STRFTIME('%m', {}) AS INTEGER) + 2) / 3)",
                expr, expr
            ),
            Increment::Year => format!("STRFTIME('%Y', {})", expr),
        }
    }

    fn spine_step(&self, expr: &str, increment: Increment) -> String {
        match increment {
            Increment::Day => format!("DATE({}, '+1 day')", expr),
            Increment::Month => format!("DATE({}, '+1 month')", expr),
            Increment::Quarter => format!("DATE({}, '+3 months')", expr),
            Increment::Year => format!("DATE({}, '+1 year')", expr),
        }
    }

    fn spine_with_clause(&self, spec: &AxisSpec) -> String {
        format!(
            "WITH RECURSIVE calendar_axis (bucket_date) AS (SELECT {} UNION ALL SELECT {} FROM calendar_axis WHERE bucket_date < {})",
            self.date_literal(spec.start),
            self.spine_step("bucket_date", spec.increment),
            self.date_literal(spec.end),
        )
    }
}
