//! The hardware IR consumed by the SystemVerilog generator.
//!
//! A front end builds a [`Context`] mapping type names to [`DataType`]s:
//! components with ports, internal signals, parameters, sub-instances,
//! processes and a bind map; bundles (structs) of signals; and opaque
//! extern modules. The IR is immutable once built. Every type derives
//! serde so a front end in another process can hand it over as JSON.
//!
//! Field references inside expressions are [`FieldId`]s into the owning
//! type's field [`Arena`], so field order is part of the data contract.

#![warn(missing_docs)]

pub mod arena;
pub mod bind;
pub mod builder;
pub mod context;
pub mod expr;
pub mod field;
pub mod function;
pub mod ids;
pub mod stmt;
pub mod types;

pub use arena::{Arena, ArenaId};
pub use bind::BindEntry;
pub use context::Context;
pub use expr::{BinOp, BoolOp, CmpOp, ConstValue, Expr, FieldRef, UnaryOp};
pub use field::{Field, FieldKind, PortDirection};
pub use function::{Arg, Function};
pub use ids::{FieldId, FunctionId};
pub use stmt::{MatchCase, Pattern, Stmt};
pub use types::{ComponentType, DataType, ExternType, IntType, StructType};
