//! Functions: process bodies and methods.

use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::types::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use zsv_source::SourceLoc;

/// A function argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    /// Argument name.
    pub name: String,
    /// Declared type, if annotated.
    #[serde(default)]
    pub datatype: Option<DataType>,
}

/// A process body or method of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Arguments in declaration order, excluding `self`.
    #[serde(default)]
    pub args: Vec<Arg>,
    /// Return element types: empty for none, one for a scalar return, more
    /// for a tuple return.
    #[serde(default)]
    pub returns: Vec<DataType>,
    /// Body statements.
    #[serde(default)]
    pub body: Vec<Stmt>,
    /// Decorator metadata. `clock` and `reset` name the sensitivity signals
    /// of a sync process.
    #[serde(default)]
    pub metadata: IndexMap<String, Expr>,
    /// Declared `async`.
    #[serde(default)]
    pub is_async: bool,
    /// Declaration site.
    #[serde(default)]
    pub source_loc: Option<SourceLoc>,
}

impl Function {
    /// Creates an empty synchronous function.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            returns: Vec::new(),
            body: Vec::new(),
            metadata: IndexMap::new(),
            is_async: false,
            source_loc: None,
        }
    }

    /// Returns the argument with the given name.
    pub fn arg(&self, name: &str) -> Option<&Arg> {
        self.args.iter().find(|a| a.name == name)
    }
}
