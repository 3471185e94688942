//! Operator spellings and SystemVerilog precedence levels.
//!
//! Higher numbers bind tighter. Operands are parenthesized only where these
//! levels require it.

use zsv_ir::{BinOp, BoolOp, CmpOp, UnaryOp};

/// Identifiers, literals, calls and anything already parenthesized.
pub const ATOM: u8 = 15;
/// Prefix operators.
pub const UNARY: u8 = 14;
/// `* / %`
pub const MULTIPLICATIVE: u8 = 12;
/// `+ -`
pub const ADDITIVE: u8 = 11;
/// `<< >>`
pub const SHIFT: u8 = 10;
/// `< <= > >=`
pub const RELATIONAL: u8 = 9;
/// `== !=`
pub const EQUALITY: u8 = 8;
/// `&`
pub const BIT_AND: u8 = 7;
/// `^`
pub const BIT_XOR: u8 = 6;
/// `|`
pub const BIT_OR: u8 = 5;
/// `&&`
pub const LOGIC_AND: u8 = 4;
/// `||`
pub const LOGIC_OR: u8 = 3;

/// Spelling and precedence of a binary operator, `None` if SystemVerilog
/// has no direct equivalent.
pub fn binop(op: BinOp) -> Option<(&'static str, u8)> {
    Some(match op {
        BinOp::Add => ("+", ADDITIVE),
        BinOp::Sub => ("-", ADDITIVE),
        BinOp::Mult => ("*", MULTIPLICATIVE),
        BinOp::Div => ("/", MULTIPLICATIVE),
        BinOp::Mod => ("%", MULTIPLICATIVE),
        BinOp::LShift => ("<<", SHIFT),
        BinOp::RShift => (">>", SHIFT),
        BinOp::BitOr => ("|", BIT_OR),
        BinOp::BitXor => ("^", BIT_XOR),
        BinOp::BitAnd => ("&", BIT_AND),
        BinOp::FloorDiv | BinOp::Pow => return None,
    })
}

/// Spelling and precedence of a comparison operator.
pub fn cmpop(op: CmpOp) -> Option<(&'static str, u8)> {
    Some(match op {
        CmpOp::Eq => ("==", EQUALITY),
        CmpOp::NotEq => ("!=", EQUALITY),
        CmpOp::Lt => ("<", RELATIONAL),
        CmpOp::LtE => ("<=", RELATIONAL),
        CmpOp::Gt => (">", RELATIONAL),
        CmpOp::GtE => (">=", RELATIONAL),
        CmpOp::Is | CmpOp::IsNot | CmpOp::In | CmpOp::NotIn => return None,
    })
}

/// Spelling and precedence of a boolean operator.
pub fn boolop(op: BoolOp) -> (&'static str, u8) {
    match op {
        BoolOp::And => ("&&", LOGIC_AND),
        BoolOp::Or => ("||", LOGIC_OR),
    }
}

/// Spelling of a prefix operator.
pub fn unaryop(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Not => "!",
        UnaryOp::Invert => "~",
        UnaryOp::UAdd => "+",
        UnaryOp::USub => "-",
    }
}

/// Wraps `text` in parentheses when its precedence is below `min`.
pub fn wrap(text: String, prec: u8, min: u8) -> String {
    if prec < min {
        format!("({text})")
    } else {
        text
    }
}

/// Wraps the right operand of a binary operator of precedence `op_prec`.
///
/// Equal precedence is wrapped too (`a - (b - c)`), and so is any prefixed
/// operand so that `a - -b` never collapses into a decrement token.
pub fn wrap_rhs(text: String, prec: u8, op_prec: u8) -> String {
    if prec <= op_prec || prec == UNARY {
        format!("({text})")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_hardware_operators() {
        assert_eq!(binop(BinOp::Add), Some(("+", ADDITIVE)));
        assert_eq!(binop(BinOp::BitXor).map(|b| b.0), Some("^"));
        assert!(binop(BinOp::Pow).is_none());
        assert!(binop(BinOp::FloorDiv).is_none());
        assert_eq!(cmpop(CmpOp::GtE).map(|c| c.0), Some(">="));
        assert!(cmpop(CmpOp::In).is_none());
        assert_eq!(boolop(BoolOp::Or).0, "||");
        assert_eq!(unaryop(UnaryOp::Not), "!");
    }

    #[test]
    fn wrap_only_below_min() {
        assert_eq!(wrap("a + b".into(), ADDITIVE, MULTIPLICATIVE), "(a + b)");
        assert_eq!(wrap("a * b".into(), MULTIPLICATIVE, ADDITIVE), "a * b");
    }

    #[test]
    fn wrap_rhs_rules() {
        assert_eq!(wrap_rhs("b - c".into(), ADDITIVE, ADDITIVE), "(b - c)");
        assert_eq!(wrap_rhs("-b".into(), UNARY, ADDITIVE), "(-b)");
        assert_eq!(wrap_rhs("b * c".into(), MULTIPLICATIVE, ADDITIVE), "b * c");
    }
}
