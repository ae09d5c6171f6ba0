//! Cross-database SQL generation.
//!
//! Compiles an abstract, ordered description of a query's clauses into
//! dialect-correct SQL text for SQL Server, MySQL, Oracle, PostgreSQL and
//! SQLite. The crate never opens a connection or executes anything: input is
//! a component model owned by the caller, output is a SQL string (plus bound
//! parameter values for the update compiler).

pub mod aggregate;
pub mod dialect;
pub mod error;
pub mod model;
pub mod syntax;
pub mod update;

pub use dialect::{Dialect, DialectProfile};

pub mod prelude {
    pub use crate::aggregate::AggregateShape;
    pub use crate::dialect::{Dialect, DialectProfile};
    pub use crate::error::{CrossqlError, CrossqlResult};
    pub use crate::model::*;
    pub use crate::syntax::{ScalarFunc, SqlSyntax, TopPlacement};
    pub use crate::update::{BoundParam, CompiledUpdate};
}
