//! Per-component generation state.
//!
//! [`ComponentCx`] bundles everything the translators need while emitting
//! one component: the shared read-only [`Context`], the component itself,
//! the options and the diagnostic sink. It is created per component on the
//! worker thread that emits it and never shared.

use crate::options::GenerateOptions;
use crate::sanitize::sanitize;
use std::cell::RefCell;
use std::collections::HashSet;
use zsv_diagnostics::{Diagnostic, DiagnosticSink};
use zsv_ir::{ComponentType, Context, DataType, Field, FieldId};

/// State for emitting one component.
pub struct ComponentCx<'a> {
    /// The whole IR.
    pub ctx: &'a Context,
    /// The component being emitted.
    pub comp: &'a ComponentType,
    /// Generation options.
    pub options: &'a GenerateOptions,
    /// Sanitized module name.
    pub module_name: String,
    sink: &'a DiagnosticSink,
    reported: RefCell<HashSet<String>>,
}

impl<'a> ComponentCx<'a> {
    /// Creates the state for `comp`, registered in the type map as `name`.
    pub fn new(
        ctx: &'a Context,
        name: &str,
        comp: &'a ComponentType,
        options: &'a GenerateOptions,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            ctx,
            comp,
            options,
            module_name: sanitize(name),
            sink,
            reported: RefCell::new(HashSet::new()),
        }
    }

    /// Reports a diagnostic against this component.
    ///
    /// The same code and message is reported once per component even if
    /// the offending fragment is rendered several times.
    pub fn report(&self, diag: Diagnostic) {
        let key = format!("{}:{}", diag.code, diag.message);
        if !self.reported.borrow_mut().insert(key) {
            return;
        }
        tracing::debug!(component = %self.comp.name, code = %diag.code, "{}", diag.message);
        self.sink.emit(
            diag.with_component(self.comp.name.clone())
                .with_location(self.comp.source_loc.clone()),
        );
    }

    /// Returns the component field at `id`.
    pub fn field(&self, id: FieldId) -> Option<&'a Field> {
        self.comp.field(id)
    }

    /// Resolves a field's declared type through `Ref` chains.
    pub fn field_type(&self, field: &'a Field) -> Option<&'a DataType> {
        self.ctx.resolve(&field.datatype)
    }

    /// Walks a field path rooted at the component.
    ///
    /// Returns the fields visited, one per path element, or `None` if any
    /// step does not resolve.
    pub fn walk_path(&self, path: &[FieldId]) -> Option<Vec<&'a Field>> {
        let (first, rest) = path.split_first()?;
        let mut fields = vec![self.field(*first)?];
        for id in rest {
            let parent = fields[fields.len() - 1];
            let owner = self.field_type(parent)?;
            fields.push(owner.fields()?.try_get(*id)?);
        }
        Some(fields)
    }

    /// Returns `true` if the field's type is a component or extern.
    pub fn is_instance(&self, field: &'a Field) -> bool {
        matches!(
            self.field_type(field),
            Some(DataType::Component(_) | DataType::Extern(_))
        )
    }
}
