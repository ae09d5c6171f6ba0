use super::{already_wrapped, ScalarFunc, SqlSyntax, TopPlacement, TopX};
use crate::dialect::Dialect;
use crate::error::{CrossqlError, CrossqlResult};
use crate::model::LogicalType;

pub struct OracleSyntax;

impl SqlSyntax for OracleSyntax {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn wrap_identifier(&self, name: &str) -> String {
        if already_wrapped(name, '"', '"') {
            return name.to_string();
        }
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn parameter_prefix(&self) -> &'static str {
        ":"
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{}", index)
    }

    fn scalar_function(&self, func: &ScalarFunc<'_>) -> CrossqlResult<String> {
        Ok(match func {
            // No LEFT/RIGHT in Oracle; SUBSTR covers both ends.
            ScalarFunc::Left { expr, len } => format!("SUBSTR({}, 1, {})", expr, len),
            ScalarFunc::Right { expr, len } => format!("SUBSTR({}, -{})", expr, len),
            ScalarFunc::Substring { expr, start, len } => {
                format!("SUBSTR({}, {}, {})", expr, start, len)
            }
            ScalarFunc::Now => "SYSTIMESTAMP".to_string(),
            ScalarFunc::StringLength { expr } => format!("LENGTH({})", expr),
            ScalarFunc::NewGuid => "SYS_GUID()".to_string(),
            ScalarFunc::Md5 { expr } => format!("STANDARD_HASH({}, 'MD5')", expr),
        })
    }

    fn type_name(&self, ty: LogicalType) -> CrossqlResult<&'static str> {
        match ty {
            // SQL-level Oracle has no boolean type (PL/SQL only).
            LogicalType::Bool => Err(CrossqlError::TypeNotMapped {
                dialect: Dialect::Oracle,
                logical_type: ty,
            }),
            LogicalType::Int => Ok("NUMBER(19)"),
            LogicalType::Float => Ok("BINARY_DOUBLE"),
            LogicalType::Decimal => Ok("NUMBER(38, 10)"),
            LogicalType::Text => Ok("VARCHAR2(4000)"),
            LogicalType::Date => Ok("DATE"),
            LogicalType::Timestamp => Ok("TIMESTAMP"),
        }
    }

    fn logical_type_of(&self, type_text: &str) -> Option<LogicalType> {
        match super::base_type(type_text).as_str() {
            "NUMBER" | "DECIMAL" | "NUMERIC" => Some(LogicalType::Decimal),
            "INTEGER" | "INT" | "SMALLINT" => Some(LogicalType::Int),
            "BINARY_DOUBLE" | "BINARY_FLOAT" | "FLOAT" => Some(LogicalType::Float),
            "VARCHAR2" | "NVARCHAR2" | "CHAR" | "NCHAR" | "CLOB" | "NCLOB" => {
                Some(LogicalType::Text)
            }
            "DATE" => Some(LogicalType::Date),
            "TIMESTAMP" => Some(LogicalType::Timestamp),
            _ => None,
        }
    }

    fn top_x(&self, limit: Option<u32>, offset: Option<u32>) -> Option<TopX> {
        // 12c row-limiting clause.
        let clause = match (limit, offset) {
            (None, None) => return None,
            (Some(n), None) => format!(" FETCH FIRST {} ROWS ONLY", n),
            (Some(n), Some(off)) => format!(" OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", off, n),
            (None, Some(off)) => format!(" OFFSET {} ROWS", off),
        };
        Some(TopX {
            clause,
            placement: TopPlacement::TrailingClause,
            requires_order_by: false,
        })
    }

    fn table_alias(&self, alias: &str) -> String {
        // Oracle rejects AS before a table alias.
        alias.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_identifier() {
        let s = OracleSyntax;
        assert_eq!(s.wrap_identifier("users"), "\"users\"");
        assert_eq!(s.wrap_identifier("odd\"name"), "\"odd\"\"name\"");
        assert_eq!(s.wrap_identifier("\"users\""), "\"users\"");
    }

    #[test]
    fn test_placeholders() {
        let s = OracleSyntax;
        assert_eq!(s.placeholder(1), ":1");
    }

    #[test]
    fn test_left_right_via_substr() {
        let s = OracleSyntax;
        assert_eq!(
            s.scalar_function(&ScalarFunc::Left { expr: "x", len: 2 }).unwrap(),
            "SUBSTR(x, 1, 2)"
        );
        assert_eq!(
            s.scalar_function(&ScalarFunc::Right { expr: "x", len: 2 }).unwrap(),
            "SUBSTR(x, -2)"
        );
    }

    #[test]
    fn test_bool_type_not_mapped() {
        let s = OracleSyntax;
        assert!(matches!(
            s.type_name(LogicalType::Bool),
            Err(CrossqlError::TypeNotMapped { .. })
        ));
    }

    #[test]
    fn test_table_alias_without_as() {
        let s = OracleSyntax;
        assert_eq!(s.table_alias("t2"), "t2");
    }
}
