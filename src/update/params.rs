//! Parameter collection for compiled updates.

use serde::{Deserialize, Serialize};

use crate::model::{LogicalType, Value};
use crate::syntax::SqlSyntax;

/// One bound parameter: stable name, value, and the logical type a binding
/// layer should declare (translated to dialect type text by the caller
/// through the type contract when needed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundParam {
    pub name: String,
    pub value: Value,
    pub logical_type: LogicalType,
}

/// A compiled update: SQL text plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledUpdate {
    pub sql: String,
    pub params: Vec<BoundParam>,
}

/// Collects parameter values as the compiler walks the request, handing back
/// the dialect's placeholder text for each.
#[derive(Debug, Default)]
pub struct ParamContext {
    index: usize,
    params: Vec<BoundParam>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value and return the placeholder that stands for it.
    pub fn bind(&mut self, value: Value, syntax: &dyn SqlSyntax) -> String {
        self.index += 1;
        let placeholder = syntax.placeholder(self.index);
        self.params.push(BoundParam {
            name: format!("p{}", self.index),
            logical_type: value.logical_type(),
            value,
        });
        placeholder
    }

    pub fn into_params(self) -> Vec<BoundParam> {
        self.params
    }
}
