//! Assembly of one component into SystemVerilog text.

use crate::bind::{resolve_instance, Instantiation};
use crate::bundle;
use crate::context::ComponentCx;
use crate::errors;
use crate::expr::render_expr;
use crate::interface::{self, ExportInterface};
use crate::param::ParamScope;
use crate::sanitize::{is_identifier, sanitize};
use crate::stmt::{self, Profile};
use crate::usage::writes_signal;
use crate::width::{self, SvType};
use indexmap::{IndexMap, IndexSet};
use std::fmt::Write;
use zsv_common::ZsvResult;
use zsv_ir::{ConstValue, DataType, Field, Function, PortDirection};
use zsv_source::SourceLoc;

/// The declarations of a module, sorted into sections.
#[derive(Default)]
struct Declarations {
    params: Vec<(String, String)>,
    ports: Vec<(PortDirection, String, SvType)>,
    internals: Vec<(String, SvType)>,
    components: Vec<Instantiation>,
    externs: Vec<Instantiation>,
}

impl Declarations {
    /// Every declared signal with its type.
    fn signal_types(&self) -> IndexMap<String, SvType> {
        self.ports
            .iter()
            .map(|(_, name, ty)| (name.clone(), ty.clone()))
            .chain(self.internals.iter().cloned())
            .collect()
    }

    fn is_declared(&self, name: &str) -> bool {
        self.ports.iter().any(|(_, n, _)| n == name) || self.internals.iter().any(|(n, _)| n == name)
    }

    fn instances(&self) -> impl Iterator<Item = &Instantiation> {
        self.components.iter().chain(&self.externs)
    }
}

/// Emits the interfaces and the module for the component in `cx`.
pub fn emit_module(cx: &ComponentCx<'_>) -> ZsvResult<String> {
    let owner = ParamScope::owner(&cx.comp.fields);
    let ifaces = interface::collect(cx);
    let mut decls = declare(cx, &owner);
    declare_wires(&mut decls);
    let types = decls.signal_types();

    let mut out = String::new();
    for iface in &ifaces {
        interface::write_interface(cx, iface, &types, &mut out)?;
        writeln!(out)?;
    }
    write_location(cx, cx.comp.source_loc.as_ref(), "", &mut out)?;
    write_header(cx, &decls, &mut out)?;
    write_internals(cx, &decls, &ifaces, &mut out)?;
    write_instances(&decls, &mut out)?;
    write_processes(cx, &mut out)?;
    if !ifaces.is_empty() {
        writeln!(out)?;
        for iface in &ifaces {
            interface::write_binding(iface, &mut out)?;
        }
    }
    writeln!(out, "endmodule")?;
    Ok(out)
}

fn declare(cx: &ComponentCx<'_>, owner: &ParamScope<'_>) -> Declarations {
    let mut decls = Declarations::default();
    let flatten_ports = !cx.comp.has_exports();
    for (id, field) in cx.comp.fields.iter() {
        let name = sanitize(&field.name);
        if field.is_const {
            decls.params.push((name, param_default(cx, field)));
            continue;
        }
        if field.is_export() {
            continue;
        }
        let Some(datatype) = cx.field_type(field) else {
            let type_name = width::describe(&field.datatype);
            cx.report(errors::warn_unknown_type(&field.name, &type_name));
            continue;
        };
        match datatype {
            DataType::Component(_) => decls.components.extend(resolve_instance(cx, id, field, owner)),
            DataType::Extern(_) => decls.externs.extend(resolve_instance(cx, id, field, owner)),
            DataType::Struct(_) => {
                let members = bundle::flatten(cx, &name, field, owner).unwrap_or_default();
                for m in members {
                    match m.direction.or(field.direction()) {
                        Some(dir) if flatten_ports => decls.ports.push((dir, m.name, m.ty)),
                        _ => decls.internals.push((m.name, m.ty)),
                    }
                }
            }
            DataType::Int(_) | DataType::Ref { .. } => {
                let ty = width::field_type_or_bit(cx, field, owner);
                match field.direction() {
                    Some(dir) => decls.ports.push((dir, name, ty)),
                    None => decls.internals.push((name, ty)),
                }
            }
        }
    }
    decls
}

/// Declares connection wires that name no existing signal.
fn declare_wires(decls: &mut Declarations) {
    let wires: Vec<(String, SvType)> = decls
        .instances()
        .flat_map(|inst| &inst.connections)
        .filter(|c| is_identifier(&c.signal))
        .map(|c| (c.signal.clone(), c.ty.clone()))
        .collect();
    for (name, ty) in wires {
        if !decls.is_declared(&name) {
            decls.internals.push((name, ty));
        }
    }
}

fn param_default(cx: &ComponentCx<'_>, field: &Field) -> String {
    match &field.default {
        Some(ConstValue::Int(v)) => v.to_string(),
        Some(ConstValue::Bool(b)) => (if *b { "1" } else { "0" }).to_string(),
        Some(other) => {
            cx.report(errors::warn_param_eval(
                &format!("default of parameter `{}`", field.name),
                &other.to_string(),
                "not an integer",
            ));
            "0".to_string()
        }
        None => {
            cx.report(errors::warn_missing_default(&field.name));
            "0".to_string()
        }
    }
}

fn write_location(
    cx: &ComponentCx<'_>,
    loc: Option<&SourceLoc>,
    indent: &str,
    out: &mut String,
) -> ZsvResult<()> {
    if let (true, Some(loc)) = (cx.options.debug_locations, loc) {
        writeln!(out, "{indent}// {loc}")?;
    }
    Ok(())
}

fn write_header(cx: &ComponentCx<'_>, decls: &Declarations, out: &mut String) -> ZsvResult<()> {
    if decls.params.is_empty() {
        writeln!(out, "module {}(", cx.module_name)?;
    } else {
        writeln!(out, "module {} #(", cx.module_name)?;
        let params: Vec<String> = decls
            .params
            .iter()
            .map(|(name, default)| format!("  parameter int {name} = {default}"))
            .collect();
        writeln!(out, "{}", params.join(",\n"))?;
        writeln!(out, ") (")?;
    }
    let ports: Vec<String> = decls
        .ports
        .iter()
        .map(|(dir, name, ty)| format!("  {} {}", dir.keyword(), ty.decl(name)))
        .collect();
    if !ports.is_empty() {
        writeln!(out, "{}", ports.join(",\n"))?;
    }
    writeln!(out, ");")?;
    Ok(())
}

fn write_internals(
    cx: &ComponentCx<'_>,
    decls: &Declarations,
    ifaces: &[ExportInterface<'_>],
    out: &mut String,
) -> ZsvResult<()> {
    if decls.internals.is_empty() {
        return Ok(());
    }
    // Testbench-style components start their free signals at zero. Signals
    // driven by an export task or by an instance port are left alone.
    let initialize = cx.comp.has_exports();
    let exported: Vec<&Function> = ifaces
        .iter()
        .flat_map(|i| i.methods.iter().map(|(_, f)| *f))
        .collect();
    let connected: IndexSet<&str> = decls
        .instances()
        .flat_map(|i| i.connections.iter().map(|c| c.signal.as_str()))
        .collect();

    writeln!(out)?;
    for (name, ty) in &decls.internals {
        let init = initialize
            && !connected.contains(name.as_str())
            && !writes_signal(cx, name, &exported);
        let init = if init { " = '0" } else { "" };
        writeln!(out, "  {}{init};", ty.decl(name))?;
    }
    Ok(())
}

fn write_instances(decls: &Declarations, out: &mut String) -> ZsvResult<()> {
    for inst in decls.instances() {
        writeln!(out)?;
        let params = if inst.params.is_empty() {
            String::new()
        } else {
            let overrides: Vec<String> = inst
                .params
                .iter()
                .map(|(name, value)| format!(".{name}({value})"))
                .collect();
            format!(" #({})", overrides.join(", "))
        };
        if inst.connections.is_empty() {
            writeln!(out, "  {}{params} {} ();", inst.module, inst.instance)?;
            continue;
        }
        writeln!(out, "  {}{params} {} (", inst.module, inst.instance)?;
        let conns: Vec<String> = inst
            .connections
            .iter()
            .map(|c| format!("    .{}({})", c.port, c.signal))
            .collect();
        writeln!(out, "{}", conns.join(",\n"))?;
        writeln!(out, "  );")?;
    }
    Ok(())
}

fn write_processes(cx: &ComponentCx<'_>, out: &mut String) -> ZsvResult<()> {
    for id in &cx.comp.sync_processes {
        let Some(func) = cx.comp.function(*id) else {
            continue;
        };
        writeln!(out)?;
        write_location(cx, func.source_loc.as_ref(), "  ", out)?;
        let events: Vec<String> = ["clock", "reset"]
            .iter()
            .filter_map(|key| func.metadata.get(*key))
            .map(|e| format!("posedge {}", render_expr(cx, e)))
            .collect();
        if events.is_empty() {
            cx.report(errors::warn_no_sensitivity(&func.name));
            writeln!(out, "  always @(/* no clock or reset */) begin")?;
        } else {
            writeln!(out, "  always @({}) begin", events.join(" or "))?;
        }
        write_body(cx, func, Profile::Registered, out)?;
        writeln!(out, "  end")?;
    }

    for id in &cx.comp.comb_processes {
        let Some(func) = cx.comp.function(*id) else {
            continue;
        };
        writeln!(out)?;
        write_location(cx, func.source_loc.as_ref(), "  ", out)?;
        writeln!(out, "  always @(*) begin")?;
        write_body(cx, func, Profile::Combinational, out)?;
        writeln!(out, "  end")?;
    }

    let exported = interface::exported_functions(cx);
    for func in free_running(cx, &exported) {
        writeln!(out)?;
        write_location(cx, func.source_loc.as_ref(), "  ", out)?;
        writeln!(out, "  initial begin : {}", stmt::block_label(func))?;
        write_body(cx, func, Profile::Initial, out)?;
        writeln!(out, "  end")?;
    }
    Ok(())
}

/// Async functions that are neither processes nor bound to an export.
fn free_running<'a>(cx: &ComponentCx<'a>, exported: &IndexSet<String>) -> Vec<&'a Function> {
    cx.comp
        .functions
        .iter()
        .filter(|(id, f)| f.is_async && !cx.comp.is_process(*id) && !exported.contains(&f.name))
        .map(|(_, f)| f)
        .collect()
}

fn write_body(
    cx: &ComponentCx<'_>,
    func: &Function,
    profile: Profile,
    out: &mut String,
) -> ZsvResult<()> {
    let block = stmt::translate(cx, func, profile, 2);
    for line in block.decls.iter().chain(&block.lines) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
