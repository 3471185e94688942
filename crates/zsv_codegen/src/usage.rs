//! Which signals a block of statements reads and writes.

use crate::context::ComponentCx;
use crate::expr::signal_name;
use indexmap::IndexSet;
use zsv_ir::{Expr, Function, Pattern, Stmt};

/// Every signal referenced in `body`, in first-seen order.
pub fn touched_signals(cx: &ComponentCx<'_>, body: &[Stmt]) -> IndexSet<String> {
    let mut seen = IndexSet::new();
    for stmt in body {
        visit_stmt(cx, stmt, &mut seen);
    }
    seen
}

/// Returns `true` if any of `functions` assigns the signal `name`.
pub fn writes_signal(cx: &ComponentCx<'_>, name: &str, functions: &[&Function]) -> bool {
    functions
        .iter()
        .any(|f| f.body.iter().any(|s| stmt_writes(cx, name, s)))
}

fn stmt_writes(cx: &ComponentCx<'_>, name: &str, stmt: &Stmt) -> bool {
    let any = |body: &[Stmt]| body.iter().any(|s| stmt_writes(cx, name, s));
    match stmt {
        Stmt::Assign { targets, .. } => targets.iter().any(|t| target_is(cx, name, t)),
        Stmt::AugAssign { target, .. } => target_is(cx, name, target),
        Stmt::If { body, orelse, .. } => any(body) || any(orelse),
        Stmt::While { body, .. } | Stmt::For { body, .. } => any(body),
        Stmt::Match { cases, .. } => cases.iter().any(|c| any(&c.body)),
        Stmt::Expr(_) | Stmt::Return(_) => false,
    }
}

fn target_is(cx: &ComponentCx<'_>, name: &str, target: &Expr) -> bool {
    match target {
        Expr::Tuple(items) => items.iter().any(|t| target_is(cx, name, t)),
        other => signal_name(cx, other).as_deref() == Some(name),
    }
}

fn visit_stmt(cx: &ComponentCx<'_>, stmt: &Stmt, seen: &mut IndexSet<String>) {
    match stmt {
        Stmt::If { test, body, orelse } => {
            visit_expr(cx, test, seen);
            body.iter().chain(orelse).for_each(|s| visit_stmt(cx, s, seen));
        }
        Stmt::Assign { targets, value } => {
            targets.iter().for_each(|t| visit_expr(cx, t, seen));
            visit_expr(cx, value, seen);
        }
        Stmt::AugAssign { target, value, .. } => {
            visit_expr(cx, target, seen);
            visit_expr(cx, value, seen);
        }
        Stmt::While { test, body } => {
            visit_expr(cx, test, seen);
            body.iter().for_each(|s| visit_stmt(cx, s, seen));
        }
        Stmt::For { target, iter, body } => {
            visit_expr(cx, target, seen);
            visit_expr(cx, iter, seen);
            body.iter().for_each(|s| visit_stmt(cx, s, seen));
        }
        Stmt::Expr(e) => visit_expr(cx, e, seen),
        Stmt::Return(value) => {
            if let Some(v) = value {
                visit_expr(cx, v, seen);
            }
        }
        Stmt::Match { subject, cases } => {
            visit_expr(cx, subject, seen);
            for case in cases {
                visit_pattern(cx, &case.pattern, seen);
                case.body.iter().for_each(|s| visit_stmt(cx, s, seen));
            }
        }
    }
}

fn visit_pattern(cx: &ComponentCx<'_>, pattern: &Pattern, seen: &mut IndexSet<String>) {
    match pattern {
        Pattern::Value(e) => visit_expr(cx, e, seen),
        Pattern::Or(alts) => alts.iter().for_each(|p| visit_pattern(cx, p, seen)),
        Pattern::Wildcard | Pattern::Capture(_) => {}
    }
}

fn visit_expr(cx: &ComponentCx<'_>, expr: &Expr, seen: &mut IndexSet<String>) {
    if let Some(name) = signal_name(cx, expr) {
        seen.insert(name);
        return;
    }
    match expr {
        Expr::Attribute { value, .. } => visit_expr(cx, value, seen),
        Expr::Bin { lhs, rhs, .. } => {
            visit_expr(cx, lhs, seen);
            visit_expr(cx, rhs, seen);
        }
        Expr::Compare {
            left, comparators, ..
        } => {
            visit_expr(cx, left, seen);
            comparators.iter().for_each(|c| visit_expr(cx, c, seen));
        }
        Expr::BoolOp { values, .. } | Expr::Tuple(values) => {
            values.iter().for_each(|v| visit_expr(cx, v, seen))
        }
        Expr::Call { args, .. } => args.iter().for_each(|a| visit_expr(cx, a, seen)),
        Expr::Unary { operand: inner, .. } | Expr::Await(inner) => visit_expr(cx, inner, seen),
        Expr::RefField(_)
        | Expr::RefPy { .. }
        | Expr::Constant(_)
        | Expr::RefParam(_)
        | Expr::RefLocal(_) => {}
    }
}
