//! IR expression rendering.
//!
//! Signals render as flat identifiers: a component field by its name, a
//! port reached through an instance as `<instance>_<port>`, a bundle member
//! as `<bundle>_<member>`. Shapes SystemVerilog cannot express render as a
//! visible placeholder comment and report `W300`.

use crate::context::ComponentCx;
use crate::errors;
use crate::ops;
use crate::param::is_int_conversion;
use crate::sanitize::sanitize;
use zsv_ir::{ConstValue, DataType, Expr, FieldRef};

/// Renders `expr` as SystemVerilog text.
pub fn render_expr(cx: &ComponentCx<'_>, expr: &Expr) -> String {
    render_prec(cx, expr).0
}

/// Renders `expr`, returning the precedence of its outermost operator.
pub fn render_prec(cx: &ComponentCx<'_>, expr: &Expr) -> (String, u8) {
    match expr {
        Expr::RefField(r) => match path_name(cx, r) {
            Some(name) => (name, ops::ATOM),
            None => dangling(cx, expr),
        },
        Expr::RefPy { base, attr } => {
            if base.is_self() {
                return (sanitize(attr), ops::ATOM);
            }
            match path_name(cx, base) {
                Some(base) => (format!("{base}_{}", sanitize(attr)), ops::ATOM),
                None => dangling(cx, expr),
            }
        }
        Expr::Attribute { value, attr } => match base_name(cx, value) {
            Some(base) => (format!("{base}_{}", sanitize(attr)), ops::ATOM),
            None => unsupported(cx, expr),
        },
        Expr::Constant(c) => constant(c),
        Expr::Bin { lhs, op, rhs } => {
            let Some((sym, prec)) = ops::binop(*op) else {
                return unsupported(cx, expr);
            };
            let (l, lp) = render_prec(cx, lhs);
            let (r, rp) = render_prec(cx, rhs);
            (
                format!("{} {sym} {}", ops::wrap(l, lp, prec), ops::wrap_rhs(r, rp, prec)),
                prec,
            )
        }
        Expr::Compare {
            left,
            ops: cmp_ops,
            comparators,
        } => {
            if cmp_ops.is_empty() || cmp_ops.len() != comparators.len() {
                return unsupported(cx, expr);
            }
            let mut pairs = Vec::with_capacity(cmp_ops.len());
            let mut lhs = render_prec(cx, left);
            for (op, right) in cmp_ops.iter().zip(comparators) {
                let Some((sym, prec)) = ops::cmpop(*op) else {
                    return unsupported(cx, expr);
                };
                let rhs = render_prec(cx, right);
                pairs.push((
                    format!(
                        "{} {sym} {}",
                        ops::wrap(lhs.0, lhs.1, prec),
                        ops::wrap_rhs(rhs.0.clone(), rhs.1, prec)
                    ),
                    prec,
                ));
                lhs = rhs;
            }
            if pairs.len() == 1 {
                return pairs.remove(0);
            }
            let text = pairs
                .into_iter()
                .map(|(t, p)| ops::wrap(t, p, ops::LOGIC_AND))
                .collect::<Vec<_>>()
                .join(" && ");
            (text, ops::LOGIC_AND)
        }
        Expr::BoolOp { op, values } => {
            let (sym, prec) = ops::boolop(*op);
            if values.is_empty() {
                return unsupported(cx, expr);
            }
            let text = values
                .iter()
                .map(|v| {
                    let (t, p) = render_prec(cx, v);
                    ops::wrap(t, p, prec)
                })
                .collect::<Vec<_>>()
                .join(&format!(" {sym} "));
            (text, prec)
        }
        Expr::Unary { op, operand } => {
            let (t, p) = render_prec(cx, operand);
            (
                format!("{}{}", ops::unaryop(*op), ops::wrap_rhs(t, p, ops::UNARY)),
                ops::UNARY,
            )
        }
        Expr::RefParam(name) | Expr::RefLocal(name) => (name.clone(), ops::ATOM),
        Expr::Call { func, args } if is_int_conversion(func) && args.len() == 1 => {
            render_prec(cx, &args[0])
        }
        Expr::Call { .. } | Expr::Await(_) | Expr::Tuple(_) => unsupported(cx, expr),
    }
}

/// The flat signal name `expr` refers to, or `None` if it is not a signal.
///
/// Parameters, locals and arguments are not signals. Nothing is reported.
pub fn signal_name(cx: &ComponentCx<'_>, expr: &Expr) -> Option<String> {
    match expr {
        Expr::RefField(r) => {
            let fields = cx.walk_path(&r.path)?;
            let last = fields.last()?;
            let is_vector = last.width_expr.is_some()
                || matches!(cx.field_type(last), Some(DataType::Int(_)));
            if last.is_const || last.is_export() || !is_vector {
                return None;
            }
            path_name(cx, r)
        }
        Expr::RefPy { base, attr } if !base.is_self() => {
            Some(format!("{}_{}", path_name(cx, base)?, sanitize(attr)))
        }
        Expr::Attribute { value, attr } => {
            Some(format!("{}_{}", base_name(cx, value)?, sanitize(attr)))
        }
        _ => None,
    }
}

/// The flat name prefix of an aggregate-valued expression.
fn base_name(cx: &ComponentCx<'_>, expr: &Expr) -> Option<String> {
    match expr {
        Expr::RefField(r) => path_name(cx, r),
        Expr::RefPy { base, attr } if !base.is_self() => {
            Some(format!("{}_{}", path_name(cx, base)?, sanitize(attr)))
        }
        Expr::Attribute { value, attr } => {
            Some(format!("{}_{}", base_name(cx, value)?, sanitize(attr)))
        }
        _ => None,
    }
}

/// `a_b_c` for the field path `self.a.b.c`.
pub fn path_name(cx: &ComponentCx<'_>, r: &FieldRef) -> Option<String> {
    let fields = cx.walk_path(&r.path)?;
    Some(
        fields
            .iter()
            .map(|f| sanitize(&f.name))
            .collect::<Vec<_>>()
            .join("_"),
    )
}

/// An inert comment standing in for an untranslatable fragment.
pub fn placeholder(echo: &str) -> String {
    format!("/* unsupported: {} */", echo.replace("*/", "* /"))
}

fn unsupported(cx: &ComponentCx<'_>, expr: &Expr) -> (String, u8) {
    let echo = expr.to_string();
    cx.report(errors::warn_unsupported_expr(&echo));
    (placeholder(&echo), ops::ATOM)
}

fn dangling(cx: &ComponentCx<'_>, expr: &Expr) -> (String, u8) {
    let echo = expr.to_string();
    cx.report(errors::warn_dangling_field(&echo));
    (placeholder(&echo), ops::ATOM)
}

fn constant(c: &ConstValue) -> (String, u8) {
    match c {
        ConstValue::Int(v) if *v < 0 => (v.to_string(), ops::UNARY),
        ConstValue::Int(v) => (v.to_string(), ops::ATOM),
        ConstValue::Bool(b) => ((if *b { "1" } else { "0" }).to_string(), ops::ATOM),
        ConstValue::Str(s) => (format!("\"{}\"", s.replace('"', "\\\"")), ops::ATOM),
    }
}
