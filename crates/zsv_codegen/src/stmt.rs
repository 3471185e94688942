//! Statement translation for process and task bodies.
//!
//! One IR statement list is rendered under a [`Profile`] that fixes the
//! assignment operator and which control flow is allowed. Clocked and
//! combinational processes are synthesizable: loops other than `for` over a
//! range, `return` and bare expression statements have no meaning there and
//! degrade to placeholder comments. Tasks and initial blocks are simulation
//! code and accept `while`, `return` and suspension points.

use crate::context::ComponentCx;
use crate::errors;
use crate::expr::{placeholder, render_expr, signal_name};
use crate::ops;
use crate::param::ParamScope;
use crate::timing;
use crate::width;
use indexmap::IndexMap;
use std::collections::HashSet;
use zsv_ir::{Expr, Function, Pattern, Stmt};

const INDENT: &str = "  ";

/// How a statement list is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Body of `always @(posedge ...)`: nonblocking assignments.
    Registered,
    /// Body of `always @(*)`: blocking assignments.
    Combinational,
    /// Body of an interface task.
    Task,
    /// Body of a named `initial` block.
    Initial,
}

impl Profile {
    fn describe(self) -> &'static str {
        match self {
            Profile::Registered => "clocked process",
            Profile::Combinational => "combinational process",
            Profile::Task => "task",
            Profile::Initial => "initial block",
        }
    }

    fn is_simulation(self) -> bool {
        matches!(self, Profile::Task | Profile::Initial)
    }
}

/// A translated body.
#[derive(Debug, Default)]
pub struct Block {
    /// Local variable declarations for the top of the enclosing block.
    pub decls: Vec<String>,
    /// Statement lines.
    pub lines: Vec<String>,
}

/// Translates the body of `func` at indentation level `depth`.
pub fn translate(cx: &ComponentCx<'_>, func: &Function, profile: Profile, depth: usize) -> Block {
    let mut w = Writer {
        cx,
        func,
        profile,
        trace: profile == Profile::Task && cx.options.trace_tasks,
        loop_vars: HashSet::new(),
        local_types: IndexMap::new(),
        lines: Vec::new(),
    };
    collect_loop_vars(&func.body, &mut w.loop_vars);
    w.local_types = w.locals();
    let decls = w
        .local_types
        .iter()
        .map(|(name, ty)| format!("{}{ty} {name};", INDENT.repeat(depth)))
        .collect();

    w.trace_line(depth, "enter");
    w.block(&func.body, depth, true);
    if !matches!(func.body.last(), Some(Stmt::Return(_))) {
        w.trace_line(depth, "exit");
    }
    Block {
        decls,
        lines: w.lines,
    }
}

struct Writer<'c, 'a> {
    cx: &'c ComponentCx<'a>,
    func: &'a Function,
    profile: Profile,
    trace: bool,
    loop_vars: HashSet<String>,
    local_types: IndexMap<String, String>,
    lines: Vec<String>,
}

impl Writer<'_, '_> {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(depth), text.as_ref()));
    }

    fn trace_line(&mut self, depth: usize, event: &str) {
        if self.trace {
            let scope = format!("{}.{}", self.cx.module_name, self.func.name);
            self.line(
                depth,
                format!("$display(\"[%0t] {scope}: {event}\", $time);"),
            );
        }
    }

    fn render(&self, expr: &Expr) -> String {
        render_expr(self.cx, expr)
    }

    fn block(&mut self, body: &[Stmt], depth: usize, top_level: bool) {
        let last = body.len().saturating_sub(1);
        for (i, stmt) in body.iter().enumerate() {
            self.stmt(stmt, depth, top_level && i == last);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, depth: usize, last_top_level: bool) {
        match stmt {
            Stmt::If { test, body, orelse } => self.if_chain(test, body, orelse, depth),
            Stmt::Assign { targets, value } => {
                for target in targets {
                    self.assign(stmt, target, value, depth);
                }
            }
            Stmt::AugAssign { target, op, value } => {
                if ops::binop(*op).is_none() {
                    return self.unsupported(stmt, depth);
                }
                let combined = Expr::bin(target.clone(), *op, value.clone());
                let text = format!(
                    "{} {} {};",
                    self.render(target),
                    self.assign_op(target),
                    self.render(&combined)
                );
                self.line(depth, text);
            }
            Stmt::While { test, body } if self.profile.is_simulation() => {
                let cond = self.render(test);
                self.line(depth, format!("while ({cond}) begin"));
                self.trace_line(depth + 1, "loop");
                self.block(body, depth + 1, false);
                self.line(depth, "end");
            }
            Stmt::For { target, iter, body } => match self.range_header(target, iter) {
                Some(header) => {
                    self.line(depth, format!("{header} begin"));
                    self.trace_line(depth + 1, "loop");
                    self.block(body, depth + 1, false);
                    self.line(depth, "end");
                }
                None => self.unsupported(stmt, depth),
            },
            Stmt::Expr(e) if timing::is_await(e) && self.profile.is_simulation() => {
                let text = timing::translate_await(self.cx, e);
                self.line(depth, text);
            }
            Stmt::Return(value) if self.profile == Profile::Task => {
                match value {
                    Some(Expr::Tuple(items)) => {
                        for (i, item) in items.iter().enumerate() {
                            let text = format!("__ret_{i} = {};", self.render(item));
                            self.line(depth, text);
                        }
                    }
                    Some(v) => {
                        let text = format!("__ret = {};", self.render(v));
                        self.line(depth, text);
                    }
                    None => {}
                }
                self.trace_line(depth, "exit");
                if !last_top_level {
                    self.line(depth, "return;");
                }
            }
            Stmt::Return(None) if self.profile == Profile::Initial => {
                let label = block_label(self.func);
                self.line(depth, format!("disable {label};"));
            }
            Stmt::Match { subject, cases } => {
                let subject = self.render(subject);
                self.line(depth, format!("case ({subject})"));
                for case in cases {
                    let label = self.label(&case.pattern);
                    self.line(depth + 1, format!("{label}: begin"));
                    self.block(&case.body, depth + 2, false);
                    self.line(depth + 1, "end");
                }
                self.line(depth, "endcase");
            }
            Stmt::While { .. } | Stmt::Expr(_) | Stmt::Return(_) => self.unsupported(stmt, depth),
        }
    }

    fn if_chain(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt], depth: usize) {
        let cond = self.render(test);
        self.line(depth, format!("if ({cond}) begin"));
        self.block(body, depth + 1, false);
        let mut orelse = orelse;
        loop {
            match orelse {
                [] => break,
                [Stmt::If {
                    test,
                    body,
                    orelse: rest,
                }] => {
                    let cond = self.render(test);
                    self.line(depth, format!("end else if ({cond}) begin"));
                    self.block(body, depth + 1, false);
                    orelse = rest;
                }
                other => {
                    self.line(depth, "end else begin");
                    self.block(other, depth + 1, false);
                    break;
                }
            }
        }
        self.line(depth, "end");
    }

    fn assign(&mut self, stmt: &Stmt, target: &Expr, value: &Expr, depth: usize) {
        match (target, value) {
            (Expr::Tuple(targets), Expr::Tuple(values)) if targets.len() == values.len() => {
                if self.reads_earlier_target(targets, values) {
                    return self.assign_through_temporaries(targets, values, depth);
                }
                for (t, v) in targets.iter().zip(values) {
                    self.assign(stmt, t, v, depth);
                }
            }
            (Expr::Tuple(_), _) => self.unsupported(stmt, depth),
            _ => {
                let text = format!(
                    "{} {} {};",
                    self.render(target),
                    self.assign_op(target),
                    self.render(value)
                );
                self.line(depth, text);
            }
        }
    }

    /// Whether splitting `targets = values` into blocking assignments would
    /// let a value observe a target written before it.
    fn reads_earlier_target(&self, targets: &[Expr], values: &[Expr]) -> bool {
        if targets.iter().any(|t| matches!(t, Expr::Tuple(_))) {
            return false;
        }
        values.iter().enumerate().any(|(j, v)| {
            targets[..j]
                .iter()
                .any(|t| self.assign_op(t) == "=" && mentions(v, t))
        })
    }

    /// `a, c = c, a` as a block that reads every value before writing.
    fn assign_through_temporaries(&mut self, targets: &[Expr], values: &[Expr], depth: usize) {
        self.line(depth, "begin");
        for (i, target) in targets.iter().enumerate() {
            let ty = self.target_type(target);
            self.line(depth + 1, format!("{ty} __tmp_{i};"));
        }
        for (i, value) in values.iter().enumerate() {
            let text = format!("__tmp_{i} = {};", self.render(value));
            self.line(depth + 1, text);
        }
        for (i, target) in targets.iter().enumerate() {
            let text = format!("{} {} __tmp_{i};", self.render(target), self.assign_op(target));
            self.line(depth + 1, text);
        }
        self.line(depth, "end");
    }

    fn target_type(&self, target: &Expr) -> String {
        match target {
            Expr::RefLocal(name) => match self.local_types.get(name) {
                Some(ty) => ty.clone(),
                None => self.infer_type(Some(target)),
            },
            _ => self.infer_type(Some(target)),
        }
    }

    fn assign_op(&self, target: &Expr) -> &'static str {
        if self.profile == Profile::Registered && !matches!(target, Expr::RefLocal(_)) {
            "<="
        } else {
            "="
        }
    }

    /// `for (int i = a; i < b; i++)` for `for i in range(...)`.
    fn range_header(&self, target: &Expr, iter: &Expr) -> Option<String> {
        let (Expr::RefLocal(var), Expr::Call { func, args }) = (target, iter) else {
            return None;
        };
        if timing::callee(func) != "range" {
            return None;
        }
        let (start, stop, step) = match args.as_slice() {
            [stop] => ("0".to_string(), self.render(stop), None),
            [start, stop] => (self.render(start), self.render(stop), None),
            [start, stop, step] => (self.render(start), self.render(stop), Some(self.render(step))),
            _ => return None,
        };
        let (cmp, update) = match step.as_deref() {
            None | Some("1") => ("<", format!("{var}++")),
            Some(step) if step.starts_with('-') => (">", format!("{var} += {step}")),
            Some(step) => ("<", format!("{var} += {step}")),
        };
        Some(format!(
            "for (int {var} = {start}; {var} {cmp} {stop}; {update})"
        ))
    }

    fn label(&self, pattern: &Pattern) -> String {
        if pattern.is_irrefutable() {
            return "default".to_string();
        }
        match pattern {
            Pattern::Value(e) => self.render(e),
            Pattern::Or(alts) => alts
                .iter()
                .map(|p| self.label(p))
                .collect::<Vec<_>>()
                .join(", "),
            Pattern::Wildcard | Pattern::Capture(_) => "default".to_string(),
        }
    }

    fn unsupported(&mut self, stmt: &Stmt, depth: usize) {
        let kind = stmt_kind(stmt);
        self.cx.report(errors::warn_unsupported_stmt(
            kind,
            &self.func.name,
            self.profile.describe(),
        ));
        let text = placeholder(&stmt_echo(stmt));
        self.line(depth, text);
    }

    /// Local variables assigned in the body, with inferred types.
    fn locals(&self) -> IndexMap<String, String> {
        let mut found: IndexMap<String, String> = IndexMap::new();
        let mut visit = |target: &Expr, value: Option<&Expr>| {
            if let Expr::RefLocal(name) = target {
                if self.func.arg(name).is_none()
                    && !self.loop_vars.contains(name)
                    && !found.contains_key(name)
                {
                    found.insert(name.clone(), self.infer_type(value));
                }
            }
        };
        walk_targets(&self.func.body, &mut visit);
        found
    }

    fn infer_type(&self, value: Option<&Expr>) -> String {
        let ty = match value {
            Some(v @ Expr::RefField(r)) if signal_name(self.cx, v).is_some() => {
                self.cx.walk_path(&r.path).and_then(|fields| {
                    let field = fields.last()?;
                    width::field_type(self.cx, field, &ParamScope::owner(&self.cx.comp.fields))
                })
            }
            Some(Expr::RefLocal(name)) => self
                .func
                .arg(name)
                .and_then(|a| a.datatype.as_ref())
                .and_then(|dt| width::datatype(self.cx, dt)),
            _ => None,
        };
        ty.map_or_else(|| "int".to_string(), |t| t.to_string())
    }
}

/// Returns `true` if `expr` is `target` or contains it.
fn mentions(expr: &Expr, target: &Expr) -> bool {
    if expr == target {
        return true;
    }
    match expr {
        Expr::Attribute { value, .. } | Expr::Unary { operand: value, .. } | Expr::Await(value) => {
            mentions(value, target)
        }
        Expr::Bin { lhs, rhs, .. } => mentions(lhs, target) || mentions(rhs, target),
        Expr::Compare {
            left, comparators, ..
        } => mentions(left, target) || comparators.iter().any(|c| mentions(c, target)),
        Expr::BoolOp { values, .. } | Expr::Tuple(values) | Expr::Call { args: values, .. } => {
            values.iter().any(|v| mentions(v, target))
        }
        Expr::RefField(_)
        | Expr::RefPy { .. }
        | Expr::Constant(_)
        | Expr::RefParam(_)
        | Expr::RefLocal(_) => false,
    }
}

/// The label of the named block around a free-running process.
pub fn block_label(func: &Function) -> String {
    crate::sanitize::sanitize(&func.name)
}

fn collect_loop_vars(body: &[Stmt], vars: &mut HashSet<String>) {
    for stmt in body {
        match stmt {
            Stmt::For { target, body, .. } => {
                if let Expr::RefLocal(name) = target {
                    vars.insert(name.clone());
                }
                collect_loop_vars(body, vars);
            }
            Stmt::If { body, orelse, .. } => {
                collect_loop_vars(body, vars);
                collect_loop_vars(orelse, vars);
            }
            Stmt::While { body, .. } => collect_loop_vars(body, vars),
            Stmt::Match { cases, .. } => {
                cases.iter().for_each(|c| collect_loop_vars(&c.body, vars))
            }
            Stmt::Assign { .. } | Stmt::AugAssign { .. } | Stmt::Expr(_) | Stmt::Return(_) => {}
        }
    }
}

/// Calls `visit(target, value)` for every assignment target in `body`.
fn walk_targets<'e>(body: &'e [Stmt], visit: &mut impl FnMut(&'e Expr, Option<&'e Expr>)) {
    for stmt in body {
        match stmt {
            Stmt::Assign { targets, value } => {
                for target in targets {
                    match (target, value) {
                        (Expr::Tuple(ts), Expr::Tuple(vs)) if ts.len() == vs.len() => {
                            ts.iter().zip(vs).for_each(|(t, v)| visit(t, Some(v)))
                        }
                        (Expr::Tuple(ts), _) => ts.iter().for_each(|t| visit(t, None)),
                        (t, v) => visit(t, Some(v)),
                    }
                }
            }
            Stmt::AugAssign { target, .. } => visit(target, None),
            Stmt::If { body, orelse, .. } => {
                walk_targets(body, visit);
                walk_targets(orelse, visit);
            }
            Stmt::While { body, .. } | Stmt::For { body, .. } => walk_targets(body, visit),
            Stmt::Match { cases, .. } => cases.iter().for_each(|c| walk_targets(&c.body, visit)),
            Stmt::Expr(_) | Stmt::Return(_) => {}
        }
    }
}

fn stmt_kind(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::If { .. } => "if",
        Stmt::Assign { .. } => "tuple assignment",
        Stmt::AugAssign { .. } => "augmented assignment",
        Stmt::While { .. } => "while",
        Stmt::For { .. } => "for",
        Stmt::Expr(Expr::Await(_)) => "await",
        Stmt::Expr(_) => "expression statement",
        Stmt::Return(_) => "return",
        Stmt::Match { .. } => "match",
    }
}

fn stmt_echo(stmt: &Stmt) -> String {
    match stmt {
        Stmt::If { test, .. } => format!("if {test}"),
        Stmt::Assign { targets, value } => {
            let targets: Vec<_> = targets.iter().map(|t| t.to_string()).collect();
            format!("{} = {value}", targets.join(" = "))
        }
        Stmt::AugAssign { target, op, value } => format!("{target} {}= {value}", op.symbol()),
        Stmt::While { test, .. } => format!("while {test}"),
        Stmt::For { target, iter, .. } => format!("for {target} in {iter}"),
        Stmt::Expr(e) => e.to_string(),
        Stmt::Return(Some(v)) => format!("return {v}"),
        Stmt::Return(None) => "return".to_string(),
        Stmt::Match { subject, .. } => format!("match {subject}"),
    }
}
