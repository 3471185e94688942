//! Bind-map entries connecting signals, ports and methods.

use crate::expr::Expr;
use serde::{Deserialize, Serialize};

/// Declares that two expressions denote the same signal or callable.
///
/// Typically one side is a port of a sub-instance (`self.core.clock`) and the
/// other the signal it connects to (`self.clock`). A method entry pairs an
/// export field's method with one of the component's own methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindEntry {
    /// Left side as written.
    pub lhs: Expr,
    /// Right side as written.
    pub rhs: Expr,
}

impl BindEntry {
    /// Creates a bind entry.
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    /// Both sides, left first.
    pub fn sides(&self) -> [&Expr; 2] {
        [&self.lhs, &self.rhs]
    }
}
