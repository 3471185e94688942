//! Mapping of IR integer types onto `logic` declarations.

use crate::context::ComponentCx;
use crate::errors;
use crate::ops;
use crate::param::{ParamScope, Sym};
use std::fmt;
use zsv_ir::{DataType, Field, IntType};

/// The packed range of a `logic` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvWidth {
    /// A single bit, no range.
    Scalar,
    /// `[bits-1:0]`.
    Fixed(u32),
    /// `[(W-1):0]` over parameter text `W`.
    Symbolic(String),
}

impl SvWidth {
    /// Maps a fixed IR width. `None` for widths that are neither the
    /// single-bit sentinels nor positive.
    pub fn from_bits(bits: i32) -> Option<Self> {
        match bits {
            1 | -1 => Some(SvWidth::Scalar),
            b if b > 1 => Some(SvWidth::Fixed(b as u32)),
            _ => None,
        }
    }

    /// Maps an evaluated width expression. A plain integer literal that fits
    /// a `u32` becomes a fixed width, so `1` yields the scalar form.
    pub fn from_param(sym: &Sym) -> Self {
        let symbolic = || SvWidth::Symbolic(ops::wrap(sym.text.clone(), sym.prec, ops::ADDITIVE));
        match sym.as_int() {
            Some(1) => SvWidth::Scalar,
            Some(n) if n > 1 => u32::try_from(n).map_or_else(|_| symbolic(), SvWidth::Fixed),
            _ => symbolic(),
        }
    }

    /// The range text including brackets, empty for a scalar.
    pub fn range(&self) -> String {
        match self {
            SvWidth::Scalar => String::new(),
            SvWidth::Fixed(bits) => format!("[{}:0]", bits.saturating_sub(1)),
            SvWidth::Symbolic(w) => format!("[({w}-1):0]"),
        }
    }
}

/// A `logic` data type with its range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvType {
    /// Packed range.
    pub width: SvWidth,
    /// `logic signed`.
    pub signed: bool,
}

impl SvType {
    /// A single unsigned bit.
    pub const BIT: SvType = SvType {
        width: SvWidth::Scalar,
        signed: false,
    };

    /// Maps an IR integer type, `None` for an invalid width.
    pub fn from_int(t: IntType) -> Option<Self> {
        Some(Self {
            width: SvWidth::from_bits(t.bits)?,
            signed: t.signed,
        })
    }

    /// `logic [31:0] name`.
    pub fn decl(&self, name: &str) -> String {
        format!("{self} {name}")
    }
}

impl fmt::Display for SvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("logic")?;
        if self.signed {
            f.write_str(" signed")?;
        }
        match &self.width {
            SvWidth::Scalar => Ok(()),
            width => write!(f, " {}", width.range()),
        }
    }
}

/// Maps a scalar/vector field to its `logic` type.
///
/// A `width_expr` takes precedence over the fixed width. Returns `None` when
/// the field is not a bit vector at all (a bundle, an instance, an unknown
/// type); callers decide how to degrade.
pub fn field_type(cx: &ComponentCx<'_>, field: &Field, scope: &ParamScope<'_>) -> Option<SvType> {
    let signed = matches!(&field.datatype, DataType::Int(t) if t.signed);
    if let Some(width) = &field.width_expr {
        let sym = scope.eval_or_report(cx, width, &format!("width of `{}`", field.name));
        return Some(SvType {
            width: SvWidth::from_param(&sym),
            signed,
        });
    }
    datatype(cx, &field.datatype)
}

/// Maps a concrete or named data type, `None` unless it is an integer.
pub fn datatype(cx: &ComponentCx<'_>, datatype: &DataType) -> Option<SvType> {
    match cx.ctx.resolve(datatype)? {
        DataType::Int(t) => SvType::from_int(*t),
        _ => None,
    }
}

/// Like [`field_type`], but degrades to a single bit and reports when the
/// field is not a bit vector.
pub fn field_type_or_bit(cx: &ComponentCx<'_>, field: &Field, scope: &ParamScope<'_>) -> SvType {
    field_type(cx, field, scope).unwrap_or_else(|| {
        cx.report(errors::warn_unresolved_type(&field.name, &describe(&field.datatype)));
        SvType::BIT
    })
}

/// A short description of a data type for diagnostics.
pub fn describe(datatype: &DataType) -> String {
    match datatype {
        DataType::Int(t) => format!("int{}", t.bits),
        other => other.name().unwrap_or("?").to_string(),
    }
}
