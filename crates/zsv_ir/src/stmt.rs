//! Statements of process and method bodies.

use crate::expr::Expr;
use serde::{Deserialize, Serialize};

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `if test: body else: orelse`.
    If {
        /// Condition.
        test: Expr,
        /// Taken branch.
        body: Vec<Stmt>,
        /// Else branch, possibly empty.
        #[serde(default)]
        orelse: Vec<Stmt>,
    },
    /// `t0 = t1 = ... = value`.
    Assign {
        /// Every target receives `value`.
        targets: Vec<Expr>,
        /// Assigned value.
        value: Expr,
    },
    /// `target op= value`.
    AugAssign {
        /// Target.
        target: Expr,
        /// Operator.
        op: crate::expr::BinOp,
        /// Right operand.
        value: Expr,
    },
    /// `while test: body`.
    While {
        /// Loop condition.
        test: Expr,
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// `for target in iter: body`.
    For {
        /// Loop variable.
        target: Expr,
        /// Iterated expression; only `range(...)` calls translate.
        iter: Expr,
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// An expression evaluated for its effect, typically an `await`.
    Expr(Expr),
    /// `return` with an optional value.
    Return(Option<Expr>),
    /// `match subject: case ...`.
    Match {
        /// Matched value.
        subject: Expr,
        /// Cases in source order.
        cases: Vec<MatchCase>,
    },
}

/// One `case` arm of a [`Stmt::Match`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    /// Pattern selecting this arm.
    pub pattern: Pattern,
    /// Arm body.
    pub body: Vec<Stmt>,
}

/// A `case` pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// A literal value.
    Value(Expr),
    /// `_`.
    Wildcard,
    /// A bare name binding the subject.
    Capture(String),
    /// `p0 | p1 | ...`.
    Or(Vec<Pattern>),
}

impl Pattern {
    /// Returns `true` if the pattern matches anything.
    pub fn is_irrefutable(&self) -> bool {
        match self {
            Pattern::Wildcard | Pattern::Capture(_) => true,
            Pattern::Value(_) => false,
            Pattern::Or(alts) => alts.iter().any(Pattern::is_irrefutable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irrefutable_patterns() {
        assert!(Pattern::Wildcard.is_irrefutable());
        assert!(Pattern::Capture("x".into()).is_irrefutable());
        assert!(!Pattern::Value(Expr::int(1)).is_irrefutable());
        assert!(Pattern::Or(vec![Pattern::Value(Expr::int(1)), Pattern::Wildcard]).is_irrefutable());
    }

    #[test]
    fn if_without_else_deserializes() {
        let json = r#"{"If":{"test":{"RefLocal":"c"},"body":[]}}"#;
        let stmt: Stmt = serde_json::from_str(json).unwrap();
        assert!(matches!(stmt, Stmt::If { orelse, .. } if orelse.is_empty()));
    }
}
