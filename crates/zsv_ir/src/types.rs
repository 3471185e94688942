//! The closed set of IR data types.

use crate::arena::Arena;
use crate::bind::BindEntry;
use crate::field::Field;
use crate::function::Function;
use crate::ids::{FieldId, FunctionId};
use serde::{Deserialize, Serialize};
use zsv_source::SourceLoc;

/// An integer bit vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntType {
    /// Width in bits. `1` and the sentinel `-1` both mean a single bit.
    pub bits: i32,
    /// Two's-complement signed.
    #[serde(default)]
    pub signed: bool,
}

impl IntType {
    /// Returns `true` if the type is a single bit.
    pub fn is_scalar(self) -> bool {
        self.bits == 1 || self.bits == -1
    }
}

/// A bundle: a named, ordered group of signals, optionally parameterized by
/// its own `const` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    /// Type name.
    pub name: String,
    /// Members in declaration order.
    pub fields: Arena<FieldId, Field>,
}

/// A hardware component, emitted as one SystemVerilog module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentType {
    /// Type name, possibly qualified (`pkg.<locals>.Counter`).
    pub name: String,
    /// Fields in declaration order. Expressions address them by position.
    pub fields: Arena<FieldId, Field>,
    /// Every function: processes and methods alike.
    #[serde(default)]
    pub functions: Arena<FunctionId, Function>,
    /// Clocked processes.
    #[serde(default)]
    pub sync_processes: Vec<FunctionId>,
    /// Combinational processes.
    #[serde(default)]
    pub comb_processes: Vec<FunctionId>,
    /// Connections between this component's signals and its sub-instances.
    #[serde(default)]
    pub bind_map: Vec<BindEntry>,
    /// Qualified name of the declaring front-end class.
    #[serde(default)]
    pub py_origin: Option<String>,
    /// Declaration site.
    #[serde(default)]
    pub source_loc: Option<SourceLoc>,
}

impl ComponentType {
    /// Creates an empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Arena::new(),
            functions: Arena::new(),
            sync_processes: Vec::new(),
            comb_processes: Vec::new(),
            bind_map: Vec::new(),
            py_origin: None,
            source_loc: None,
        }
    }

    /// Returns the field at `id`, or `None` for a dangling reference.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.try_get(id)
    }

    /// Finds a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<(FieldId, &Field)> {
        self.fields.iter().find(|(_, f)| f.name == name)
    }

    /// Returns the function at `id`, or `None` for a dangling reference.
    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.try_get(id)
    }

    /// Finds a function by name.
    pub fn function_by_name(&self, name: &str) -> Option<(FunctionId, &Function)> {
        self.functions.iter().find(|(_, f)| f.name == name)
    }

    /// Returns `true` if any field is an export.
    pub fn has_exports(&self) -> bool {
        self.fields.values().any(Field::is_export)
    }

    /// Returns `true` if `id` is listed as a sync or comb process.
    pub fn is_process(&self, id: FunctionId) -> bool {
        self.sync_processes.contains(&id) || self.comb_processes.contains(&id)
    }
}

/// An externally supplied module: instantiated, never emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternType {
    /// Type name.
    pub name: String,
    /// Module name to instantiate; the sanitized type name when absent.
    #[serde(default)]
    pub extern_name: Option<String>,
    /// Where the module comes from (a file set or library name).
    #[serde(default)]
    pub origin: Option<String>,
    /// Port list.
    pub fields: Arena<FieldId, Field>,
}

/// An IR data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    /// A bit vector.
    Int(IntType),
    /// A reference to a named type in the [`Context`](crate::Context).
    Ref {
        /// Name of the referenced type.
        name: String,
    },
    /// A bundle.
    Struct(StructType),
    /// A component.
    Component(ComponentType),
    /// An extern module.
    Extern(ExternType),
}

impl DataType {
    /// A single unsigned bit.
    pub fn bit() -> Self {
        Self::uint(1)
    }

    /// An unsigned vector of `bits` bits.
    pub fn uint(bits: i32) -> Self {
        DataType::Int(IntType {
            bits,
            signed: false,
        })
    }

    /// A reference to the named type.
    pub fn named(name: impl Into<String>) -> Self {
        DataType::Ref { name: name.into() }
    }

    /// The declared name of an aggregate type or the referenced name.
    pub fn name(&self) -> Option<&str> {
        match self {
            DataType::Int(_) => None,
            DataType::Ref { name } => Some(name),
            DataType::Struct(s) => Some(&s.name),
            DataType::Component(c) => Some(&c.name),
            DataType::Extern(e) => Some(&e.name),
        }
    }

    /// The field list of a bundle, component or extern.
    pub fn fields(&self) -> Option<&Arena<FieldId, Field>> {
        match self {
            DataType::Struct(s) => Some(&s.fields),
            DataType::Component(c) => Some(&c.fields),
            DataType::Extern(e) => Some(&e.fields),
            DataType::Int(_) | DataType::Ref { .. } => None,
        }
    }

    /// Finds a member field by name.
    pub fn field_by_name(&self, name: &str) -> Option<(FieldId, &Field)> {
        self.fields()?.iter().find(|(_, f)| f.name == name)
    }
}
