use super::{already_wrapped, ScalarFunc, SqlSyntax, TopPlacement, TopX};
use crate::dialect::Dialect;
use crate::error::{CrossqlError, CrossqlResult};
use crate::model::LogicalType;

pub struct SqliteSyntax;

impl SqlSyntax for SqliteSyntax {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn wrap_identifier(&self, name: &str) -> String {
        if already_wrapped(name, '"', '"') {
            return name.to_string();
        }
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn parameter_prefix(&self) -> &'static str {
        "?"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn scalar_function(&self, func: &ScalarFunc<'_>) -> CrossqlResult<String> {
        match func {
            ScalarFunc::Left { expr, len } => Ok(format!("SUBSTR({}, 1, {})", expr, len)),
            ScalarFunc::Right { expr, len } => Ok(format!("SUBSTR({}, -{})", expr, len)),
            ScalarFunc::Substring { expr, start, len } => {
                Ok(format!("SUBSTR({}, {}, {})", expr, start, len))
            }
            ScalarFunc::Now => Ok("DATETIME('now')".to_string()),
            ScalarFunc::StringLength { expr } => Ok(format!("LENGTH({})", expr)),
            ScalarFunc::NewGuid => Ok("LOWER(HEX(RANDOMBLOB(16)))".to_string()),
            // No built-in MD5 in SQLite.
            ScalarFunc::Md5 { .. } => Err(CrossqlError::UnsupportedFunction {
                dialect: Dialect::Sqlite,
                function: func.name(),
            }),
        }
    }

    fn type_name(&self, ty: LogicalType) -> CrossqlResult<&'static str> {
        // Storage-class affinities; dates travel as text.
        Ok(match ty {
            LogicalType::Bool => "INTEGER",
            LogicalType::Int => "INTEGER",
            LogicalType::Float => "REAL",
            LogicalType::Decimal => "NUMERIC",
            LogicalType::Text => "TEXT",
            LogicalType::Date => "TEXT",
            LogicalType::Timestamp => "TEXT",
        })
    }

    fn logical_type_of(&self, type_text: &str) -> Option<LogicalType> {
        // Affinity rules collapse most names onto the five storage classes.
        match super::base_type(type_text).as_str() {
            "INTEGER" | "INT" | "BIGINT" => Some(LogicalType::Int),
            "REAL" | "DOUBLE" | "FLOAT" => Some(LogicalType::Float),
            "NUMERIC" | "DECIMAL" => Some(LogicalType::Decimal),
            "TEXT" | "VARCHAR" | "CHAR" | "CLOB" => Some(LogicalType::Text),
            _ => None,
        }
    }

    fn top_x(&self, limit: Option<u32>, offset: Option<u32>) -> Option<TopX> {
        let clause = match (limit, offset) {
            (None, None) => return None,
            (Some(n), None) => format!(" LIMIT {}", n),
            (Some(n), Some(off)) => format!(" LIMIT {} OFFSET {}", n, off),
            // OFFSET needs a LIMIT; -1 means unbounded.
            (None, Some(off)) => format!(" LIMIT -1 OFFSET {}", off),
        };
        Some(TopX {
            clause,
            placement: TopPlacement::TrailingClause,
            requires_order_by: false,
        })
    }
}
