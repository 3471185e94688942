//! Fields of components and bundles.

use crate::expr::{ConstValue, Expr};
use crate::types::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Direction of a port field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven from outside the component.
    Input,
    /// Driven by the component.
    Output,
    /// Bidirectional.
    InOut,
}

impl PortDirection {
    /// The SystemVerilog direction keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
            PortDirection::InOut => "inout",
        }
    }
}

/// What role a field plays in its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// A directional port.
    Port(PortDirection),
    /// An internal signal, sub-instance or bundle; a parameter when `is_const`.
    Plain,
    /// An exported method interface, accessed through a generated
    /// SystemVerilog `interface`.
    Export,
}

/// A named, typed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as declared.
    pub name: String,
    /// Port, plain or export.
    pub kind: FieldKind,
    /// Declared type.
    pub datatype: DataType,
    /// Parameter fields are `const`.
    #[serde(default)]
    pub is_const: bool,
    /// Declared default of a parameter field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ConstValue>,
    /// Symbolic width over the owner's parameters, overriding the fixed
    /// width of `datatype`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_expr: Option<Expr>,
    /// Parameter overrides for an instance or bundle field, keyed by the
    /// target type's parameter name and written over the owner's parameters.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub kwargs_expr: IndexMap<String, Expr>,
}

impl Field {
    /// Creates a field with no parameter metadata.
    pub fn new(name: impl Into<String>, kind: FieldKind, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            kind,
            datatype,
            is_const: false,
            default: None,
            width_expr: None,
            kwargs_expr: IndexMap::new(),
        }
    }

    /// Returns the port direction, if this is a port.
    pub fn direction(&self) -> Option<PortDirection> {
        match self.kind {
            FieldKind::Port(dir) => Some(dir),
            FieldKind::Plain | FieldKind::Export => None,
        }
    }

    /// Returns `true` for export fields.
    pub fn is_export(&self) -> bool {
        self.kind == FieldKind::Export
    }
}
