//! Programmatic construction of components and bundles.
//!
//! Front ends embedding the generator and the test suites build IR through
//! these helpers instead of spelling out every [`Field`] by hand. Each
//! method that adds a field returns its [`FieldId`] for use in expressions.

use crate::bind::BindEntry;
use crate::expr::{ConstValue, Expr, FieldRef};
use crate::field::{Field, FieldKind, PortDirection};
use crate::function::Function;
use crate::ids::{FieldId, FunctionId};
use crate::types::{ComponentType, DataType, ExternType, StructType};
use crate::Arena;
use indexmap::IndexMap;
use zsv_source::SourceLoc;

/// Adds typed fields to a field arena.
#[derive(Debug, Default)]
pub struct FieldsBuilder {
    fields: Arena<FieldId, Field>,
}

impl FieldsBuilder {
    /// Adds an arbitrary field.
    pub fn field(&mut self, field: Field) -> FieldId {
        self.fields.alloc(field)
    }

    /// Adds a fixed-width port.
    pub fn port(&mut self, name: &str, dir: PortDirection, bits: i32) -> FieldId {
        self.field(Field::new(name, FieldKind::Port(dir), DataType::uint(bits)))
    }

    /// Adds a fixed-width input port.
    pub fn input(&mut self, name: &str, bits: i32) -> FieldId {
        self.port(name, PortDirection::Input, bits)
    }

    /// Adds a fixed-width output port.
    pub fn output(&mut self, name: &str, bits: i32) -> FieldId {
        self.port(name, PortDirection::Output, bits)
    }

    /// Adds a port whose width is a parameter expression.
    pub fn port_width(&mut self, name: &str, dir: PortDirection, width: Expr) -> FieldId {
        let mut field = Field::new(name, FieldKind::Port(dir), DataType::uint(-1));
        field.width_expr = Some(width);
        self.field(field)
    }

    /// Adds a fixed-width internal signal.
    pub fn signal(&mut self, name: &str, bits: i32) -> FieldId {
        self.field(Field::new(name, FieldKind::Plain, DataType::uint(bits)))
    }

    /// Adds a 32-bit parameter with an integer default.
    pub fn param(&mut self, name: &str, default: i64) -> FieldId {
        let mut field = Field::new(name, FieldKind::Plain, DataType::uint(32));
        field.is_const = true;
        field.default = Some(ConstValue::Int(default));
        self.field(field)
    }

    /// Adds a field of a named aggregate type with parameter overrides.
    pub fn typed(
        &mut self,
        name: &str,
        kind: FieldKind,
        type_name: &str,
        kwargs: Vec<(&str, Expr)>,
    ) -> FieldId {
        let mut field = Field::new(name, kind, DataType::named(type_name));
        field.kwargs_expr = kwargs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<IndexMap<_, _>>();
        self.field(field)
    }

    /// Returns the finished field list.
    pub fn into_fields(self) -> Arena<FieldId, Field> {
        self.fields
    }
}

/// Builds a [`ComponentType`].
#[derive(Debug)]
pub struct ComponentBuilder {
    /// Field list under construction.
    pub fields: FieldsBuilder,
    comp: ComponentType,
}

impl ComponentBuilder {
    /// Starts a component named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            fields: FieldsBuilder::default(),
            comp: ComponentType::new(name),
        }
    }

    /// Adds a sub-instance of component or extern `type_name`.
    pub fn instance(&mut self, name: &str, type_name: &str, kwargs: Vec<(&str, Expr)>) -> FieldId {
        self.fields.typed(name, FieldKind::Plain, type_name, kwargs)
    }

    /// Adds an internal bundle field.
    pub fn bundle(&mut self, name: &str, type_name: &str, kwargs: Vec<(&str, Expr)>) -> FieldId {
        self.fields.typed(name, FieldKind::Plain, type_name, kwargs)
    }

    /// Adds an export field.
    pub fn export(&mut self, name: &str, type_name: &str) -> FieldId {
        self.fields.typed(name, FieldKind::Export, type_name, Vec::new())
    }

    /// Adds a method or free-running process.
    pub fn function(&mut self, func: Function) -> FunctionId {
        self.comp.functions.alloc(func)
    }

    /// Adds a clocked process with the given clock and reset fields.
    pub fn sync_process(
        &mut self,
        mut func: Function,
        clock: Option<FieldId>,
        reset: Option<FieldId>,
    ) -> FunctionId {
        if let Some(clock) = clock {
            func.metadata.insert("clock".into(), Expr::field(clock));
        }
        if let Some(reset) = reset {
            func.metadata.insert("reset".into(), Expr::field(reset));
        }
        let id = self.comp.functions.alloc(func);
        self.comp.sync_processes.push(id);
        id
    }

    /// Adds a combinational process.
    pub fn comb_process(&mut self, func: Function) -> FunctionId {
        let id = self.comp.functions.alloc(func);
        self.comp.comb_processes.push(id);
        id
    }

    /// Adds a bind-map entry.
    pub fn bind(&mut self, lhs: Expr, rhs: Expr) {
        self.comp.bind_map.push(BindEntry::new(lhs, rhs));
    }

    /// Binds `export.method` to the component's own method `target`.
    pub fn bind_method(&mut self, export: FieldId, method: &str, target: &str) {
        self.bind(
            Expr::RefPy {
                base: FieldRef::field(export),
                attr: method.to_string(),
            },
            Expr::RefPy {
                base: FieldRef::this(),
                attr: target.to_string(),
            },
        );
    }

    /// Records the declaration site.
    pub fn source_loc(&mut self, loc: SourceLoc) {
        self.comp.source_loc = Some(loc);
    }

    /// Finishes the component.
    pub fn build(mut self) -> DataType {
        self.comp.fields = self.fields.into_fields();
        DataType::Component(self.comp)
    }
}

/// Builds a [`StructType`] bundle.
#[derive(Debug)]
pub struct StructBuilder {
    /// Member list under construction.
    pub fields: FieldsBuilder,
    name: String,
}

impl StructBuilder {
    /// Starts a bundle named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            fields: FieldsBuilder::default(),
            name: name.to_string(),
        }
    }

    /// Finishes the bundle.
    pub fn build(self) -> DataType {
        DataType::Struct(StructType {
            name: self.name,
            fields: self.fields.into_fields(),
        })
    }
}

/// Builds an [`ExternType`] from a port list.
pub fn extern_module(name: &str, extern_name: Option<&str>, ports: FieldsBuilder) -> DataType {
    DataType::Extern(ExternType {
        name: name.to_string(),
        extern_name: extern_name.map(str::to_string),
        origin: None,
        fields: ports.into_fields(),
    })
}

/// `self.<parent>.<child>`.
pub fn subport(parent: FieldId, child: FieldId) -> Expr {
    Expr::RefField(FieldRef::subfield(parent, child))
}

/// `self.<inst>.<attr>` on an extern instance.
pub fn py_attr(inst: FieldId, attr: &str) -> Expr {
    Expr::RefPy {
        base: FieldRef::field(inst),
        attr: attr.to_string(),
    }
}
