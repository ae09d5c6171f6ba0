use super::{already_wrapped, ScalarFunc, SqlSyntax, TopPlacement, TopX};
use crate::dialect::Dialect;
use crate::error::CrossqlResult;
use crate::model::LogicalType;

pub struct MySqlSyntax;

impl SqlSyntax for MySqlSyntax {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn wrap_identifier(&self, name: &str) -> String {
        if already_wrapped(name, '`', '`') {
            return name.to_string();
        }
        format!("`{}`", name.replace('`', "``"))
    }

    fn parameter_prefix(&self) -> &'static str {
        "?"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn scalar_function(&self, func: &ScalarFunc<'_>) -> CrossqlResult<String> {
        Ok(match func {
            ScalarFunc::Left { expr, len } => format!("LEFT({}, {})", expr, len),
            ScalarFunc::Right { expr, len } => format!("RIGHT({}, {})", expr, len),
            ScalarFunc::Substring { expr, start, len } => {
                format!("SUBSTRING({}, {}, {})", expr, start, len)
            }
            ScalarFunc::Now => "NOW()".to_string(),
            ScalarFunc::StringLength { expr } => format!("CHAR_LENGTH({})", expr),
            ScalarFunc::NewGuid => "UUID()".to_string(),
            ScalarFunc::Md5 { expr } => format!("MD5({})", expr),
        })
    }

    fn type_name(&self, ty: LogicalType) -> CrossqlResult<&'static str> {
        // MySQL CAST targets, not column types: SIGNED/CHAR rather than
        // BIGINT/VARCHAR.
        Ok(match ty {
            LogicalType::Bool => "SIGNED",
            LogicalType::Int => "SIGNED",
            LogicalType::Float => "DOUBLE",
            LogicalType::Decimal => "DECIMAL(38, 10)",
            LogicalType::Text => "CHAR",
            LogicalType::Date => "DATE",
            LogicalType::Timestamp => "DATETIME",
        })
    }

    fn logical_type_of(&self, type_text: &str) -> Option<LogicalType> {
        match super::base_type(type_text).as_str() {
            "TINYINT" | "BOOL" | "BOOLEAN" => Some(LogicalType::Bool),
            "SIGNED" | "UNSIGNED" | "BIGINT" | "INT" | "INTEGER" | "SMALLINT" | "MEDIUMINT" => {
                Some(LogicalType::Int)
            }
            "DOUBLE" | "FLOAT" => Some(LogicalType::Float),
            "DECIMAL" | "NUMERIC" => Some(LogicalType::Decimal),
            "CHAR" | "VARCHAR" | "TEXT" | "LONGTEXT" | "MEDIUMTEXT" => Some(LogicalType::Text),
            "DATE" => Some(LogicalType::Date),
            "DATETIME" | "TIMESTAMP" => Some(LogicalType::Timestamp),
            _ => None,
        }
    }

    fn top_x(&self, limit: Option<u32>, offset: Option<u32>) -> Option<TopX> {
        let clause = match (limit, offset) {
            (None, None) => return None,
            (Some(n), None) => format!(" LIMIT {}", n),
            (Some(n), Some(off)) => format!(" LIMIT {} OFFSET {}", n, off),
            // MySQL has no bare OFFSET; the documented idiom is a huge LIMIT.
            (None, Some(off)) => format!(" LIMIT 18446744073709551615 OFFSET {}", off),
        };
        Some(TopX {
            clause,
            placement: TopPlacement::TrailingClause,
            requires_order_by: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_identifier() {
        let s = MySqlSyntax;
        assert_eq!(s.wrap_identifier("users"), "`users`");
        assert_eq!(s.wrap_identifier("odd`name"), "`odd``name`");
        assert_eq!(s.wrap_identifier("`users`"), "`users`");
    }

    #[test]
    fn test_top_x_trailing() {
        let s = MySqlSyntax;
        let top = s.top_x(Some(10), Some(5)).unwrap();
        assert_eq!(top.clause, " LIMIT 10 OFFSET 5");
        assert_eq!(top.placement, TopPlacement::TrailingClause);
        assert!(!top.requires_order_by);
    }

    #[test]
    fn test_scalar_functions() {
        let s = MySqlSyntax;
        assert_eq!(
            s.scalar_function(&ScalarFunc::StringLength { expr: "`name`" }).unwrap(),
            "CHAR_LENGTH(`name`)"
        );
        assert_eq!(s.scalar_function(&ScalarFunc::NewGuid).unwrap(), "UUID()");
    }

    #[test]
    fn test_cast_uses_mysql_cast_targets() {
        let s = MySqlSyntax;
        assert_eq!(s.cast_expr("x", LogicalType::Int).unwrap(), "CAST(x AS SIGNED)");
        assert_eq!(s.cast_expr("x", LogicalType::Text).unwrap(), "CAST(x AS CHAR)");
    }
}
