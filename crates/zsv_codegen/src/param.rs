//! Symbolic evaluation of width and parameter-override expressions.
//!
//! A width such as `DATA_WIDTH/8` or an override such as
//! `WIDTH = DATA_WIDTH+4` is rendered as SystemVerilog text over parameter
//! names, never folded to a number: the same expression is instantiated at
//! many sites with different parameter values.
//!
//! Expressions are written against the parameters of one namespace, the
//! [`ParamScope`]. In the owning component's own scope a parameter renders
//! as its name. In a foreign scope (a bundle member or an instance port seen
//! from the parent) a parameter renders as the override supplied by the
//! parent's kwargs, or else as its declared default.

use crate::context::ComponentCx;
use crate::errors;
use crate::ops;
use indexmap::IndexMap;
use zsv_ir::{Arena, ConstValue, Expr, Field, FieldId};

/// Placeholder parameter name emitted when evaluation fails.
pub const UNRESOLVED_PARAM: &str = "ZSV_UNRESOLVED_PARAM";

/// Rendered parameter text with the precedence of its outermost operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sym {
    /// SystemVerilog text, without spaces around operators.
    pub text: String,
    /// Precedence level from [`ops`].
    pub prec: u8,
}

impl Sym {
    /// A single token.
    pub fn atom(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prec: ops::ATOM,
        }
    }

    /// Returns the integer value if the text is a plain literal.
    pub fn as_int(&self) -> Option<i64> {
        self.text.parse().ok()
    }
}

/// Why an expression could not be rendered symbolically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// A field reference that is not a parameter.
    #[error("`{0}` is not a parameter")]
    NotAParameter(String),
    /// A field reference past the end of the field list.
    #[error("field #{0} does not exist")]
    DanglingField(u32),
    /// A parameter with neither override nor default in a foreign scope.
    #[error("parameter `{0}` has no value")]
    NoValue(String),
    /// Any other expression shape.
    #[error("unsupported construct `{0}`")]
    Unsupported(String),
}

/// The parameter namespace an expression is evaluated in.
pub struct ParamScope<'a> {
    fields: &'a Arena<FieldId, Field>,
    overrides: IndexMap<String, Sym>,
    foreign: bool,
}

impl<'a> ParamScope<'a> {
    /// The scope of the component being emitted: parameters render by name.
    pub fn owner(fields: &'a Arena<FieldId, Field>) -> Self {
        Self {
            fields,
            overrides: IndexMap::new(),
            foreign: false,
        }
    }

    /// The scope of a nested type: parameters render as `overrides`, or as
    /// their declared defaults.
    pub fn foreign(fields: &'a Arena<FieldId, Field>, overrides: IndexMap<String, Sym>) -> Self {
        Self {
            fields,
            overrides,
            foreign: true,
        }
    }

    /// Builds the foreign scope for a field of type `fields` declared in
    /// `self`, evaluating `field.kwargs_expr` in `self`.
    ///
    /// Overrides that fail to evaluate become [`UNRESOLVED_PARAM`] and are
    /// reported.
    pub fn nested(
        &self,
        cx: &ComponentCx<'_>,
        field: &Field,
        fields: &'a Arena<FieldId, Field>,
    ) -> ParamScope<'a> {
        let overrides = field
            .kwargs_expr
            .iter()
            .map(|(name, expr)| {
                let sym = self.eval_or_report(cx, expr, &format!("override `{name}`"));
                (name.clone(), sym)
            })
            .collect();
        ParamScope::foreign(fields, overrides)
    }

    /// The overrides of a foreign scope, in declaration order.
    pub fn overrides(&self) -> &IndexMap<String, Sym> {
        &self.overrides
    }

    /// Evaluates `expr`, reporting a failure and returning the placeholder.
    pub fn eval_or_report(&self, cx: &ComponentCx<'_>, expr: &Expr, what: &str) -> Sym {
        match self.eval(expr) {
            Ok(sym) => sym,
            Err(err) => {
                cx.report(errors::warn_param_eval(
                    what,
                    &expr.to_string(),
                    &err.to_string(),
                ));
                Sym::atom(UNRESOLVED_PARAM)
            }
        }
    }

    /// Renders `expr` symbolically.
    pub fn eval(&self, expr: &Expr) -> Result<Sym, ParamError> {
        match expr {
            Expr::RefField(r) => match r.path.as_slice() {
                [id] => {
                    let field = self
                        .fields
                        .try_get(*id)
                        .ok_or(ParamError::DanglingField(id.as_raw()))?;
                    if !field.is_const {
                        return Err(ParamError::NotAParameter(field.name.clone()));
                    }
                    self.param(&field.name)
                }
                _ => Err(ParamError::Unsupported(expr.to_string())),
            },
            Expr::RefParam(name) => self.param(name),
            Expr::Constant(ConstValue::Int(v)) => Ok(int_sym(*v)),
            Expr::Constant(ConstValue::Bool(b)) => Ok(Sym::atom(if *b { "1" } else { "0" })),
            Expr::Bin { lhs, op, rhs } => {
                let (sym, prec) =
                    ops::binop(*op).ok_or_else(|| ParamError::Unsupported(expr.to_string()))?;
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                Ok(Sym {
                    text: format!(
                        "{}{sym}{}",
                        ops::wrap(lhs.text, lhs.prec, prec),
                        ops::wrap_rhs(rhs.text, rhs.prec, prec)
                    ),
                    prec,
                })
            }
            Expr::Unary { op, operand } => {
                let inner = self.eval(operand)?;
                match op {
                    zsv_ir::UnaryOp::UAdd => Ok(inner),
                    zsv_ir::UnaryOp::USub => Ok(Sym {
                        text: format!("-{}", ops::wrap(inner.text, inner.prec, ops::UNARY)),
                        prec: ops::UNARY,
                    }),
                    _ => Err(ParamError::Unsupported(expr.to_string())),
                }
            }
            Expr::Call { func, args } if is_int_conversion(func) && args.len() == 1 => {
                self.eval(&args[0])
            }
            _ => Err(ParamError::Unsupported(expr.to_string())),
        }
    }

    fn param(&self, name: &str) -> Result<Sym, ParamError> {
        if let Some(sym) = self.overrides.get(name) {
            return Ok(sym.clone());
        }
        if !self.foreign {
            return Ok(Sym::atom(name));
        }
        let field = self
            .fields
            .values()
            .find(|f| f.is_const && f.name == name)
            .ok_or_else(|| ParamError::NotAParameter(name.to_string()))?;
        match &field.default {
            Some(ConstValue::Int(v)) => Ok(int_sym(*v)),
            Some(ConstValue::Bool(b)) => Ok(Sym::atom(if *b { "1" } else { "0" })),
            _ => Err(ParamError::NoValue(name.to_string())),
        }
    }
}

fn int_sym(v: i64) -> Sym {
    if v < 0 {
        Sym {
            text: v.to_string(),
            prec: ops::UNARY,
        }
    } else {
        Sym::atom(v.to_string())
    }
}

/// Returns `true` for `int(...)` and its qualified spellings.
pub fn is_int_conversion(func: &str) -> bool {
    matches!(func, "int" | "builtins.int")
}
