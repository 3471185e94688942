//! Suspension points of async processes and exported tasks.
//!
//! An `await` statement is recognized structurally against the two
//! primitives the simulator understands, a fixed delay or a wait for a rising
//! edge, and rewritten as a SystemVerilog timing control.

use crate::context::ComponentCx;
use crate::errors;
use crate::expr::render_prec;
use crate::ops;
use zsv_ir::{ConstValue, Expr};

/// A simulation time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Femtoseconds.
    Fs,
    /// Picoseconds.
    Ps,
    /// Nanoseconds.
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    S,
}

impl TimeUnit {
    /// Parses a unit name such as `ns`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "fs" => TimeUnit::Fs,
            "ps" => TimeUnit::Ps,
            "ns" => TimeUnit::Ns,
            "us" => TimeUnit::Us,
            "ms" => TimeUnit::Ms,
            "s" => TimeUnit::S,
            _ => return None,
        })
    }

    /// The SystemVerilog time literal suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }
}

/// A recognized suspension primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suspend {
    /// Wait for a duration.
    Delay {
        /// Rendered amount.
        amount: String,
        /// Precedence of `amount`.
        prec: u8,
        /// Time unit, or the simulator's default unit when absent.
        unit: Option<TimeUnit>,
    },
    /// Wait for a rising edge of a signal.
    WaitEdge(String),
}

impl Suspend {
    /// The timing-control statement.
    pub fn to_sv(&self) -> String {
        match self {
            Suspend::WaitEdge(signal) => format!("@(posedge {signal});"),
            Suspend::Delay { amount, prec, unit } => {
                let literal = amount.chars().all(|c| c.is_ascii_digit());
                match unit {
                    Some(unit) if literal => format!("#{amount}{};", unit.suffix()),
                    Some(unit) => format!(
                        "#({} * 1{});",
                        ops::wrap(amount.clone(), *prec, ops::MULTIPLICATIVE),
                        unit.suffix()
                    ),
                    None => format!("#{};", ops::wrap(amount.clone(), *prec, ops::ATOM)),
                }
            }
        }
    }
}

/// Recognizes the awaited expression of an `await`.
pub fn recognize(cx: &ComponentCx<'_>, awaited: &Expr) -> Option<Suspend> {
    let Expr::Call { func, args } = awaited else {
        return None;
    };
    match (callee(func), args.as_slice()) {
        ("posedge", [signal]) => Some(Suspend::WaitEdge(render_prec(cx, signal).0)),
        ("wait" | "delay", [duration]) => Some(delay(cx, duration)),
        _ => None,
    }
}

/// Translates an `await` statement, degrading to a placeholder.
pub fn translate_await(cx: &ComponentCx<'_>, stmt: &Expr) -> String {
    if let Expr::Await(awaited) = stmt {
        if let Some(suspend) = recognize(cx, awaited) {
            return suspend.to_sv();
        }
    }
    let echo = stmt.to_string();
    cx.report(errors::warn_unrecognized_suspend(&echo));
    format!("/* unsupported await: {} */", echo.replace("*/", "* /"))
}

fn delay(cx: &ComponentCx<'_>, duration: &Expr) -> Suspend {
    match duration {
        Expr::Call { func, args } if args.len() == 1 => {
            if let Some(unit) = TimeUnit::from_name(callee(func)) {
                let (amount, prec) = render_prec(cx, &args[0]);
                return Suspend::Delay {
                    amount,
                    prec,
                    unit: Some(unit),
                };
            }
        }
        Expr::Tuple(items) => {
            if let [amount, Expr::Constant(ConstValue::Str(unit))] = items.as_slice() {
                if let Some(unit) = TimeUnit::from_name(unit) {
                    let (amount, prec) = render_prec(cx, amount);
                    return Suspend::Delay {
                        amount,
                        prec,
                        unit: Some(unit),
                    };
                }
            }
        }
        _ => {}
    }
    let (amount, prec) = render_prec(cx, duration);
    Suspend::Delay {
        amount,
        prec,
        unit: None,
    }
}

/// The last segment of a dotted callee name.
pub(crate) fn callee(func: &str) -> &str {
    func.rsplit('.').next().unwrap_or(func)
}

/// Returns `true` if `expr` is an `await` expression.
pub fn is_await(expr: &Expr) -> bool {
    matches!(expr, Expr::Await(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_cx;
    use zsv_ir::builder::ComponentBuilder;
    use zsv_ir::{BinOp, Context, FieldId};

    fn context() -> (Context, FieldId, FieldId) {
        let mut ctx = Context::new();
        let mut b = ComponentBuilder::new("Xtor");
        let clock = b.fields.input("clock", 1);
        let cycles = b.fields.signal("cycles", 8);
        ctx.add(b.build());
        (ctx, clock, cycles)
    }

    fn translate(ctx: &Context, stmt: &Expr) -> String {
        with_cx(ctx, "Xtor", |cx, _| translate_await(cx, stmt))
    }

    #[test]
    fn edge_wait() {
        let (ctx, clock, _) = context();
        let stmt = Expr::await_call("zdc.posedge", vec![Expr::field(clock)]);
        assert_eq!(translate(&ctx, &stmt), "@(posedge clock);");
    }

    #[test]
    fn delays() {
        let (ctx, _, cycles) = context();
        let unit_call = Expr::await_call("zdc.wait", vec![Expr::call("zdc.ns", vec![Expr::int(10)])]);
        assert_eq!(translate(&ctx, &unit_call), "#10ns;");

        let tuple = Expr::await_call(
            "delay",
            vec![Expr::Tuple(vec![
                Expr::int(5),
                Expr::Constant(ConstValue::Str("us".into())),
            ])],
        );
        assert_eq!(translate(&ctx, &tuple), "#5us;");

        let bare = Expr::await_call("zdc.delay", vec![Expr::local("n")]);
        assert_eq!(translate(&ctx, &bare), "#n;");

        let computed = Expr::await_call(
            "wait",
            vec![Expr::call(
                "ps",
                vec![Expr::bin(Expr::field(cycles), BinOp::Add, Expr::int(1))],
            )],
        );
        assert_eq!(translate(&ctx, &computed), "#((cycles + 1) * 1ps);");
    }

    #[test]
    fn unrecognized_suspend_is_visible() {
        let (ctx, _, _) = context();
        let stmt = Expr::await_call("self.fifo.get", vec![]);
        with_cx(&ctx, "Xtor", |cx, sink| {
            let text = translate_await(cx, &stmt);
            assert_eq!(text, "/* unsupported await: await self.fifo.get() */");
            assert_eq!(sink.diagnostics()[0].code, errors::W306);
        });
    }
}
