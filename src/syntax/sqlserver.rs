use super::{already_wrapped, ScalarFunc, SqlSyntax, TopPlacement, TopX};
use crate::dialect::Dialect;
use crate::error::CrossqlResult;
use crate::model::LogicalType;

pub struct SqlServerSyntax;

impl SqlSyntax for SqlServerSyntax {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn wrap_identifier(&self, name: &str) -> String {
        if already_wrapped(name, '[', ']') {
            return name.to_string();
        }
        format!("[{}]", name.replace(']', "]]"))
    }

    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    fn scalar_function(&self, func: &ScalarFunc<'_>) -> CrossqlResult<String> {
        Ok(match func {
            ScalarFunc::Left { expr, len } => format!("LEFT({}, {})", expr, len),
            ScalarFunc::Right { expr, len } => format!("RIGHT({}, {})", expr, len),
            ScalarFunc::Substring { expr, start, len } => {
                format!("SUBSTRING({}, {}, {})", expr, start, len)
            }
            ScalarFunc::Now => "GETDATE()".to_string(),
            ScalarFunc::StringLength { expr } => format!("LEN({})", expr),
            ScalarFunc::NewGuid => "NEWID()".to_string(),
            ScalarFunc::Md5 { expr } => format!("HASHBYTES('MD5', {})", expr),
        })
    }

    fn type_name(&self, ty: LogicalType) -> CrossqlResult<&'static str> {
        Ok(match ty {
            LogicalType::Bool => "BIT",
            LogicalType::Int => "BIGINT",
            LogicalType::Float => "FLOAT",
            LogicalType::Decimal => "DECIMAL(38, 10)",
            LogicalType::Text => "NVARCHAR(MAX)",
            LogicalType::Date => "DATE",
            LogicalType::Timestamp => "DATETIME2",
        })
    }

    fn logical_type_of(&self, type_text: &str) -> Option<LogicalType> {
        match super::base_type(type_text).as_str() {
            "BIT" => Some(LogicalType::Bool),
            "BIGINT" | "INT" | "SMALLINT" | "TINYINT" => Some(LogicalType::Int),
            "FLOAT" | "REAL" => Some(LogicalType::Float),
            "DECIMAL" | "NUMERIC" | "MONEY" => Some(LogicalType::Decimal),
            "NVARCHAR" | "VARCHAR" | "NCHAR" | "CHAR" | "TEXT" | "NTEXT" => Some(LogicalType::Text),
            "DATE" => Some(LogicalType::Date),
            "DATETIME2" | "DATETIME" | "SMALLDATETIME" => Some(LogicalType::Timestamp),
            _ => None,
        }
    }

    fn top_x(&self, limit: Option<u32>, offset: Option<u32>) -> Option<TopX> {
        match (limit, offset) {
            (None, None) => None,
            // Plain row cap: TOP goes right after SELECT, no ORDER BY demanded.
            (Some(n), None) => Some(TopX {
                clause: format!("TOP {} ", n),
                placement: TopPlacement::InlineAfterSelect,
                requires_order_by: false,
            }),
            // Any offset forces OFFSET/FETCH, which T-SQL only allows after
            // an ORDER BY.
            (lim, Some(off)) => {
                let mut clause = format!(" OFFSET {} ROWS", off);
                if let Some(n) = lim {
                    clause.push_str(&format!(" FETCH NEXT {} ROWS ONLY", n));
                }
                Some(TopX {
                    clause,
                    placement: TopPlacement::TrailingClause,
                    requires_order_by: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_identifier() {
        let s = SqlServerSyntax;
        assert_eq!(s.wrap_identifier("users"), "[users]");
        assert_eq!(s.wrap_identifier("odd]name"), "[odd]]name]");
        // Idempotent: no double-wrap.
        assert_eq!(s.wrap_identifier("[users]"), "[users]");
    }

    #[test]
    fn test_placeholders() {
        let s = SqlServerSyntax;
        assert_eq!(s.parameter_prefix(), "@");
        assert_eq!(s.placeholder(3), "@p3");
    }

    #[test]
    fn test_top_x_inline_without_offset() {
        let s = SqlServerSyntax;
        let top = s.top_x(Some(10), None).unwrap();
        assert_eq!(top.clause, "TOP 10 ");
        assert_eq!(top.placement, TopPlacement::InlineAfterSelect);
        assert!(!top.requires_order_by);
    }

    #[test]
    fn test_top_x_offset_requires_order_by() {
        let s = SqlServerSyntax;
        let top = s.top_x(Some(10), Some(5)).unwrap();
        assert_eq!(top.clause, " OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY");
        assert_eq!(top.placement, TopPlacement::TrailingClause);
        assert!(top.requires_order_by);
    }

    #[test]
    fn test_type_translation_inverse() {
        let s = SqlServerSyntax;
        assert_eq!(s.logical_type_of("NVARCHAR(MAX)"), Some(LogicalType::Text));
        assert_eq!(s.logical_type_of("decimal(10, 2)"), Some(LogicalType::Decimal));
        assert_eq!(s.logical_type_of("GEOGRAPHY"), None);
    }

    #[test]
    fn test_scalar_functions() {
        let s = SqlServerSyntax;
        assert_eq!(
            s.scalar_function(&ScalarFunc::Left { expr: "name", len: 3 }).unwrap(),
            "LEFT(name, 3)"
        );
        assert_eq!(s.scalar_function(&ScalarFunc::Now).unwrap(), "GETDATE()");
        assert_eq!(
            s.scalar_function(&ScalarFunc::Md5 { expr: "name" }).unwrap(),
            "HASHBYTES('MD5', name)"
        );
    }
}
