//! The dialect registry: a closed set of supported databases, each mapped to
//! its syntax / aggregate / update strategy triple.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::dates::{
    AggregateDialect, MySqlAggregate, OracleAggregate, PostgresAggregate, SqlServerAggregate,
    SqliteAggregate,
};
use crate::aggregate::{self, AggregateShape};
use crate::error::{CrossqlError, CrossqlResult};
use crate::model::{AggregateRequest, UpdateRequest};
use crate::syntax::{
    MySqlSyntax, OracleSyntax, PostgresSyntax, SqlServerSyntax, SqlSyntax, SqliteSyntax,
};
use crate::update::{self, CompiledUpdate, UpdateStrategy};

/// Supported SQL dialects.
///
/// A closed union: adding a dialect forces every match in the crate to
/// account for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    SqlServer,
    MySql,
    Oracle,
    Postgres,
    Sqlite,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::SqlServer,
        Dialect::MySql,
        Dialect::Oracle,
        Dialect::Postgres,
        Dialect::Sqlite,
    ];

    /// The dialect's syntax rules.
    pub fn syntax(&self) -> Box<dyn SqlSyntax> {
        match self {
            Dialect::SqlServer => Box::new(SqlServerSyntax),
            Dialect::MySql => Box::new(MySqlSyntax),
            Dialect::Oracle => Box::new(OracleSyntax),
            Dialect::Postgres => Box::new(PostgresSyntax),
            Dialect::Sqlite => Box::new(SqliteSyntax),
        }
    }

    /// The dialect's aggregate-compilation strategy.
    pub fn aggregate(&self) -> Box<dyn AggregateDialect> {
        match self {
            Dialect::SqlServer => Box::new(SqlServerAggregate),
            Dialect::MySql => Box::new(MySqlAggregate),
            Dialect::Oracle => Box::new(OracleAggregate),
            Dialect::Postgres => Box::new(PostgresAggregate),
            Dialect::Sqlite => Box::new(SqliteAggregate),
        }
    }

    /// The dialect's cross-table update strategy.
    pub fn update_strategy(&self) -> UpdateStrategy {
        match self {
            Dialect::SqlServer => UpdateStrategy::UpdateFrom,
            Dialect::MySql => UpdateStrategy::NativeJoin,
            Dialect::Oracle => UpdateStrategy::ExistsSubquery,
            Dialect::Postgres => UpdateStrategy::UpdateFrom,
            Dialect::Sqlite => UpdateStrategy::UpdateFrom,
        }
    }

    /// The full strategy triple.
    pub fn profile(&self) -> DialectProfile {
        DialectProfile::new(*self)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::SqlServer => write!(f, "sqlserver"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Oracle => write!(f, "oracle"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = CrossqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" | "sql-server" => Ok(Dialect::SqlServer),
            "mysql" => Ok(Dialect::MySql),
            "oracle" => Ok(Dialect::Oracle),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(CrossqlError::UnknownDialect(other.to_string())),
        }
    }
}

/// One dialect's collaborating strategies, bundled.
///
/// Stateless and immutable; construct once and share freely across threads,
/// or construct per call — there is nothing to initialize beyond constant
/// lookup tables.
pub struct DialectProfile {
    pub dialect: Dialect,
    syntax: Box<dyn SqlSyntax>,
    aggregate: Box<dyn AggregateDialect>,
    strategy: UpdateStrategy,
}

impl DialectProfile {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            syntax: dialect.syntax(),
            aggregate: dialect.aggregate(),
            strategy: dialect.update_strategy(),
        }
    }

    pub fn syntax(&self) -> &dyn SqlSyntax {
        self.syntax.as_ref()
    }

    pub fn update_strategy(&self) -> UpdateStrategy {
        self.strategy
    }

    /// Which shape a request would compile to.
    pub fn shape_of(&self, request: &AggregateRequest) -> AggregateShape {
        AggregateShape::of(request)
    }

    /// Compile an aggregate request to SQL.
    pub fn aggregate_sql(&self, request: &AggregateRequest) -> CrossqlResult<String> {
        aggregate::build_aggregate(request, self.syntax.as_ref(), self.aggregate.as_ref())
    }

    /// The pivot-value discovery query for a pivot request.
    pub fn pivot_values_sql(&self, request: &AggregateRequest) -> CrossqlResult<String> {
        debug!(dialect = %self.dialect, "compiling pivot discovery query");
        aggregate::pivot::build_pivot_values_sql(request, self.syntax.as_ref())
    }

    /// Compile a cross-table update to SQL plus bound parameters.
    pub fn update_sql(&self, request: &UpdateRequest) -> CrossqlResult<CompiledUpdate> {
        update::build_update(request, self.syntax.as_ref(), self.strategy)
    }
}
