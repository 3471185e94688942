//! Expression trees for behavioral code, width expressions and bind entries.
//!
//! The same [`Expr`] type serves process bodies, method bodies, symbolic
//! width expressions (`DATA_WIDTH/8`) and instance parameter overrides.
//! [`Display`](std::fmt::Display) renders the front-end surface syntax and is
//! used to echo unsupported constructs in generated output.

use crate::ids::FieldId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A path of field positions rooted at the owning component ("self").
///
/// A one-element path names a field of the component itself. Longer paths
/// step through the type of each field: `[core, clock]` is port `clock` of
/// the sub-instance `core`, `[bus, valid]` is member `valid` of bundle `bus`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRef {
    /// Field positions from the root outwards.
    pub path: Vec<FieldId>,
}

impl FieldRef {
    /// A reference to a field of the owning component.
    pub fn field(id: FieldId) -> Self {
        Self { path: vec![id] }
    }

    /// A reference to a field nested inside `parent`.
    pub fn subfield(parent: FieldId, child: FieldId) -> Self {
        Self {
            path: vec![parent, child],
        }
    }

    /// The empty path, denoting the owning component itself.
    pub fn this() -> Self {
        Self { path: Vec::new() }
    }

    /// Returns `true` for the empty path.
    pub fn is_self(&self) -> bool {
        self.path.is_empty()
    }
}

/// A literal constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstValue {
    /// An integer literal.
    Int(i64),
    /// A boolean literal.
    Bool(bool),
    /// A string literal, passed through unchanged.
    Str(String),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::Bool(true) => write!(f, "True"),
            ConstValue::Bool(false) => write!(f, "False"),
            ConstValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// A binary arithmetic or bitwise operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mult,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
}

impl BinOp {
    /// The surface-syntax spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mult => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtE,
    /// `>`
    Gt,
    /// `>=`
    GtE,
    /// `is`
    Is,
    /// `is not`
    IsNot,
    /// `in`
    In,
    /// `not in`
    NotIn,
}

impl CmpOp {
    /// The surface-syntax spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }
}

/// A short-circuit boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOp {
    /// `and`
    And,
    /// `or`
    Or,
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Logical `not`.
    Not,
    /// Bitwise `~`.
    Invert,
    /// Unary `+`.
    UAdd,
    /// Unary `-`.
    USub,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A field reached through a path of field positions.
    RefField(FieldRef),
    /// A named attribute on a field path, resolved by name rather than by
    /// position: ports of extern instances, methods of export fields, and
    /// (with an empty base) methods of the component itself.
    RefPy {
        /// The object the attribute is read from.
        base: FieldRef,
        /// Attribute name.
        attr: String,
    },
    /// A literal.
    Constant(ConstValue),
    /// Member access on a bundle-valued expression.
    Attribute {
        /// The bundle expression.
        value: Box<Expr>,
        /// Member name.
        attr: String,
    },
    /// A binary arithmetic or bitwise operation.
    Bin {
        /// Left operand.
        lhs: Box<Expr>,
        /// Operator.
        op: BinOp,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// A comparison chain `left op0 c0 op1 c1 ...`.
    Compare {
        /// First operand.
        left: Box<Expr>,
        /// One operator per comparator.
        ops: Vec<CmpOp>,
        /// Right-hand operands, in chain order.
        comparators: Vec<Expr>,
    },
    /// `a and b and ...` / `a or b or ...`.
    BoolOp {
        /// Operator joining every value.
        op: BoolOp,
        /// Operands, at least two.
        values: Vec<Expr>,
    },
    /// A unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// A module parameter by name.
    RefParam(String),
    /// A method argument or local variable by name.
    RefLocal(String),
    /// A call of a named function (`posedge`, `range`, `int`, ...).
    Call {
        /// Dotted callee name as written (`zdc.posedge`).
        func: String,
        /// Positional arguments.
        args: Vec<Expr>,
    },
    /// `await <expr>`.
    Await(Box<Expr>),
    /// A tuple of values.
    Tuple(Vec<Expr>),
}

impl Expr {
    /// A reference to a field of the owning component.
    pub fn field(id: FieldId) -> Self {
        Expr::RefField(FieldRef::field(id))
    }

    /// An integer literal.
    pub fn int(value: i64) -> Self {
        Expr::Constant(ConstValue::Int(value))
    }

    /// A binary operation.
    pub fn bin(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
        Expr::Bin {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// A single comparison.
    pub fn compare(left: Expr, op: CmpOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
        }
    }

    /// A unary operation.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// A call of a named function.
    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: func.into(),
            args,
        }
    }

    /// `await <call>`.
    pub fn await_call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Await(Box::new(Expr::call(func, args)))
    }

    /// A local variable or argument.
    pub fn local(name: impl Into<String>) -> Self {
        Expr::RefLocal(name.into())
    }

    /// Member access on a bundle-valued expression.
    pub fn attr(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "self")?;
        for id in &self.path {
            write!(f, ".<{}>", id.as_raw())?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::RefField(r) => write!(f, "{r}"),
            Expr::RefPy { base, attr } => write!(f, "{base}.{attr}"),
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            Expr::Bin { lhs, op, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                write!(f, "{left}")?;
                for (op, c) in ops.iter().zip(comparators) {
                    write!(f, " {} {c}", op.symbol())?;
                }
                Ok(())
            }
            Expr::BoolOp { op, values } => {
                let sep = match op {
                    BoolOp::And => " and ",
                    BoolOp::Or => " or ",
                };
                write!(f, "(")?;
                write_joined(f, values, sep)?;
                write!(f, ")")
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => write!(f, "not {operand}"),
                UnaryOp::Invert => write!(f, "~{operand}"),
                UnaryOp::UAdd => write!(f, "+{operand}"),
                UnaryOp::USub => write!(f, "-{operand}"),
            },
            Expr::RefParam(name) | Expr::RefLocal(name) => write!(f, "{name}"),
            Expr::Call { func, args } => {
                write!(f, "{func}(")?;
                write_joined(f, args, ", ")?;
                write!(f, ")")
            }
            Expr::Await(inner) => write!(f, "await {inner}"),
            Expr::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items, ", ")?;
                write!(f, ")")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
