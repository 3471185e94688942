//! Interfaces generated for export fields.
//!
//! Each export field becomes a SystemVerilog `interface` holding one task
//! per bound method and a copy of every signal those tasks touch. The module
//! instantiates the interface under the export's name and connects the
//! copies with continuous assignments: signals a task writes flow out of
//! the interface, everything else flows in.

use crate::context::ComponentCx;
use crate::errors;
use crate::sanitize::sanitize;
use crate::stmt::{self, Profile};
use crate::usage::{touched_signals, writes_signal};
use crate::width::{self, SvType};
use indexmap::{IndexMap, IndexSet};
use std::fmt::Write;
use zsv_common::ZsvResult;
use zsv_ir::{Expr, Field, Function};

/// One export field and the methods bound to it.
pub struct ExportInterface<'a> {
    /// Export field name, also the interface instance name.
    pub instance: String,
    /// `<module>_<export>`.
    pub name: String,
    /// `(method name, implementing function)` in bind-map order.
    pub methods: Vec<(String, &'a Function)>,
    /// Signals touched by the methods, with whether any method writes them.
    pub signals: Vec<(String, bool)>,
}

/// Collects the export interfaces of the component.
///
/// Exports with no bound method are reported and produce no interface.
pub fn collect<'a>(cx: &ComponentCx<'a>) -> Vec<ExportInterface<'a>> {
    let mut out = Vec::new();
    for (id, field) in cx.comp.fields.iter().filter(|(_, f)| f.is_export()) {
        let methods = bound_methods(cx, id, field);
        if methods.is_empty() {
            cx.report(errors::warn_unbound_export(&field.name));
            continue;
        }
        let funcs: Vec<&Function> = methods.iter().map(|(_, f)| *f).collect();
        let mut touched = IndexSet::new();
        for func in &funcs {
            touched.extend(touched_signals(cx, &func.body));
        }
        let signals = touched
            .into_iter()
            .map(|name| {
                let written = writes_signal(cx, &name, &funcs);
                (name, written)
            })
            .collect();
        out.push(ExportInterface {
            instance: sanitize(&field.name),
            name: format!("{}_{}", cx.module_name, sanitize(&field.name)),
            methods,
            signals,
        });
    }
    out
}

/// Names of the component functions bound to any export method.
pub fn exported_functions(cx: &ComponentCx<'_>) -> IndexSet<String> {
    cx.comp
        .fields
        .iter()
        .filter(|(_, f)| f.is_export())
        .flat_map(|(id, f)| bound_methods(cx, id, f))
        .map(|(_, func)| func.name.clone())
        .collect()
}

fn bound_methods<'a>(
    cx: &ComponentCx<'a>,
    id: zsv_ir::FieldId,
    field: &Field,
) -> Vec<(String, &'a Function)> {
    let mut methods: Vec<(String, &'a Function)> = Vec::new();
    for entry in &cx.comp.bind_map {
        let [lhs, rhs] = entry.sides();
        let pair = match (lhs, rhs) {
            (
                Expr::RefPy { base: e, attr: method },
                Expr::RefPy { base: s, attr: target },
            )
            | (
                Expr::RefPy { base: s, attr: target },
                Expr::RefPy { base: e, attr: method },
            ) if e.path.as_slice() == [id] && s.is_self() => Some((method, target)),
            _ => None,
        };
        let Some((method, target)) = pair else {
            continue;
        };
        match cx.comp.function_by_name(target) {
            Some((_, func)) if !methods.iter().any(|(m, _)| m == method) => {
                methods.push((method.clone(), func));
            }
            Some(_) => {}
            None => tracing::debug!(
                export = %field.name,
                %method,
                "bound method `{target}` does not exist"
            ),
        }
    }
    methods
}

/// Writes the `interface ... endinterface` declaration.
///
/// `types` maps module signal names to their declared types.
pub fn write_interface(
    cx: &ComponentCx<'_>,
    iface: &ExportInterface<'_>,
    types: &IndexMap<String, SvType>,
    out: &mut String,
) -> ZsvResult<()> {
    writeln!(out, "interface {};", iface.name)?;
    for (name, written) in &iface.signals {
        let ty = types.get(name).cloned().unwrap_or_else(|| {
            cx.report(errors::warn_unresolved_type(name, "undeclared signal"));
            SvType::BIT
        });
        let init = if *written { " = '0" } else { "" };
        writeln!(out, "  {}{init};", ty.decl(name))?;
    }
    for (method, func) in &iface.methods {
        writeln!(out)?;
        writeln!(out, "  task {}({});", sanitize(method), task_ports(cx, func).join(", "))?;
        let block = stmt::translate(cx, func, Profile::Task, 2);
        for line in block.decls.iter().chain(&block.lines) {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "  endtask")?;
    }
    writeln!(out, "endinterface")?;
    Ok(())
}

/// Writes the interface instance and its assignments inside the module.
pub fn write_binding(iface: &ExportInterface<'_>, out: &mut String) -> ZsvResult<()> {
    writeln!(out, "  {} {}();", iface.name, iface.instance)?;
    for (name, written) in &iface.signals {
        if *written {
            writeln!(out, "  assign {name} = {}.{name};", iface.instance)?;
        } else {
            writeln!(out, "  assign {}.{name} = {name};", iface.instance)?;
        }
    }
    Ok(())
}

fn task_ports(cx: &ComponentCx<'_>, func: &Function) -> Vec<String> {
    let type_text = |dt: Option<&zsv_ir::DataType>| {
        dt.and_then(|dt| width::datatype(cx, dt))
            .map_or_else(|| "int".to_string(), |t| t.to_string())
    };
    let mut ports: Vec<String> = func
        .args
        .iter()
        .map(|a| format!("input {} {}", type_text(a.datatype.as_ref()), a.name))
        .collect();
    match func.returns.as_slice() {
        [] => {}
        [ret] => ports.push(format!("output {} __ret", type_text(Some(ret)))),
        rets => ports.extend(
            rets.iter()
                .enumerate()
                .map(|(i, r)| format!("output {} __ret_{i}", type_text(Some(r)))),
        ),
    }
    ports
}
