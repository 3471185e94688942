//! Resolution of the bind map into instance port connections.
//!
//! Each bind entry connects two expressions. For a given instance, a side
//! that names one of the instance's ports (`self.<inst>.<port>` by field
//! position, or `self.<inst>.attr` by name on an extern) becomes the port,
//! and the other side becomes the connected signal. When both sides are
//! ports of instances, the two instances share one wire named after the
//! left-hand side. Entries that name no port of the instance are ignored.

use crate::bundle;
use crate::context::ComponentCx;
use crate::expr::render_expr;
use crate::param::ParamScope;
use crate::sanitize::sanitize;
use crate::width::{self, SvType};
use zsv_ir::{DataType, Expr, Field, FieldId};

/// One `.port(signal)` connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Port name on the instantiated module.
    pub port: String,
    /// Connected expression text in the parent.
    pub signal: String,
    /// The port's type, seen from the parent.
    pub ty: SvType,
}

/// A resolved sub-instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instantiation {
    /// Instance name.
    pub instance: String,
    /// Instantiated module name.
    pub module: String,
    /// `#(.NAME(value))` overrides, in declaration order.
    pub params: Vec<(String, String)>,
    /// Port connections, one per port.
    pub connections: Vec<Connection>,
}

/// A port of an instance named by one side of a bind entry.
struct PortMatch<'a> {
    name: String,
    field: Option<&'a Field>,
}

/// Resolves the instance field `id`. Returns `None` if the field's type is
/// not a component or extern.
pub fn resolve_instance(
    cx: &ComponentCx<'_>,
    id: FieldId,
    field: &Field,
    owner: &ParamScope<'_>,
) -> Option<Instantiation> {
    let datatype = cx.field_type(field)?;
    let (module, fields) = match datatype {
        DataType::Component(c) => {
            let module = match &field.datatype {
                DataType::Ref { name } if cx.ctx.types.contains_key(name) => sanitize(name),
                _ => sanitize(&c.name),
            };
            (module, &c.fields)
        }
        DataType::Extern(e) => (
            e.extern_name.clone().unwrap_or_else(|| sanitize(&e.name)),
            &e.fields,
        ),
        _ => return None,
    };
    let scope = owner.nested(cx, field, fields);
    let params = scope
        .overrides()
        .iter()
        .map(|(name, sym)| (name.clone(), sym.text.clone()))
        .collect();

    let mut connections: Vec<Connection> = Vec::new();
    for entry in &cx.comp.bind_map {
        let [lhs, rhs] = entry.sides();
        let (port, other) = match (match_port(cx, id, lhs), match_port(cx, id, rhs)) {
            (Some(port), _) => (port, rhs),
            (None, Some(port)) => (port, lhs),
            (None, None) => continue,
        };
        let signal = if instance_of(cx, other).is_some() {
            render_expr(cx, lhs)
        } else {
            render_expr(cx, other)
        };
        for conn in connect(cx, port, signal, &scope) {
            if !connections.iter().any(|c| c.port == conn.port) {
                connections.push(conn);
            }
        }
    }

    Some(Instantiation {
        instance: sanitize(&field.name),
        module,
        params,
        connections,
    })
}

/// Expands a matched port into connections, flattening bundle ports.
fn connect(
    cx: &ComponentCx<'_>,
    port: PortMatch<'_>,
    signal: String,
    scope: &ParamScope<'_>,
) -> Vec<Connection> {
    let Some(field) = port.field else {
        return vec![Connection {
            port: port.name,
            signal,
            ty: SvType::BIT,
        }];
    };
    if let Some(members) = bundle::flatten(cx, &port.name, field, scope) {
        return members
            .into_iter()
            .map(|m| Connection {
                signal: format!("{signal}_{}", m.suffix),
                port: m.name,
                ty: m.ty,
            })
            .collect();
    }
    vec![Connection {
        ty: width::field_type(cx, field, scope).unwrap_or(SvType::BIT),
        port: port.name,
        signal,
    }]
}

/// Matches `side` against the ports of instance `id`.
fn match_port<'a>(cx: &ComponentCx<'a>, id: FieldId, side: &Expr) -> Option<PortMatch<'a>> {
    match side {
        Expr::RefField(r) if r.path.len() >= 2 && r.path[0] == id => {
            let fields = cx.walk_path(&r.path)?;
            let name = fields[1..]
                .iter()
                .map(|f| sanitize(&f.name))
                .collect::<Vec<_>>()
                .join("_");
            Some(PortMatch {
                name,
                field: fields.last().copied(),
            })
        }
        Expr::RefPy { base, attr } if base.path.as_slice() == [id] => {
            let inst = cx.field(id)?;
            let field = cx
                .field_type(inst)
                .and_then(|dt| dt.field_by_name(attr))
                .map(|(_, f)| f);
            Some(PortMatch {
                name: sanitize(attr),
                field,
            })
        }
        _ => None,
    }
}

/// The instance whose port `side` names, if any.
pub fn instance_of(cx: &ComponentCx<'_>, side: &Expr) -> Option<FieldId> {
    let first = match side {
        Expr::RefField(r) if r.path.len() >= 2 => r.path[0],
        Expr::RefPy { base, .. } if base.path.len() == 1 => base.path[0],
        _ => return None,
    };
    let field = cx.field(first)?;
    cx.is_instance(field).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_cx;
    use zsv_ir::builder::{extern_module, py_attr, subport, ComponentBuilder, FieldsBuilder, StructBuilder};
    use zsv_ir::{BinOp, Context, FieldKind, PortDirection};

    fn resolve_all(ctx: &Context) -> Vec<Instantiation> {
        with_cx(ctx, "Top", |cx, _| {
            let owner = ParamScope::owner(&cx.comp.fields);
            cx.comp
                .fields
                .iter()
                .filter_map(|(id, f)| resolve_instance(cx, id, f, &owner))
                .collect()
        })
    }

    #[test]
    fn ports_params_and_local_signals() {
        let mut ctx = Context::new();
        let mut child = ComponentBuilder::new("MyC");
        let dw = child.fields.param("DATA_WIDTH", 32);
        let clk = child.fields.input("clock", 1);
        let dat = child
            .fields
            .port_width("dat_o", PortDirection::Output, Expr::field(dw));
        ctx.add(child.build());

        let mut top = ComponentBuilder::new("Top");
        let w = top.fields.param("DATA_WIDTH", 32);
        let clock = top.fields.input("clock", 1);
        let data = top.fields.signal("data", 36);
        let c3 = top.instance(
            "c3",
            "MyC",
            vec![("DATA_WIDTH", Expr::bin(Expr::field(w), BinOp::Add, Expr::int(4)))],
        );
        top.bind(subport(c3, clk), Expr::field(clock));
        top.bind(Expr::field(clock), subport(c3, clk));
        top.bind(subport(c3, dat), Expr::field(data));
        ctx.add(top.build());

        let insts = resolve_all(&ctx);
        assert_eq!(insts.len(), 1);
        let inst = &insts[0];
        assert_eq!(inst.module, "MyC");
        assert_eq!(inst.instance, "c3");
        assert_eq!(inst.params, vec![("DATA_WIDTH".to_string(), "DATA_WIDTH+4".to_string())]);
        assert_eq!(inst.connections.len(), 2);
        assert_eq!(inst.connections[0].port, "clock");
        assert_eq!(inst.connections[0].signal, "clock");
        assert_eq!(inst.connections[1].port, "dat_o");
        assert_eq!(inst.connections[1].signal, "data");
        assert_eq!(inst.connections[1].ty.to_string(), "logic [(DATA_WIDTH+4-1):0]");
    }

    #[test]
    fn bundle_ports_between_instances_share_wires() {
        let mut ctx = Context::new();
        let mut bus = StructBuilder::new("Bus");
        bus.fields.port("valid", PortDirection::Output, 1);
        bus.fields.port("data", PortDirection::Output, 8);
        ctx.add(bus.build());
        for (name, port, dir) in [
            ("Producer", "out", PortDirection::Output),
            ("Consumer", "inp", PortDirection::Input),
        ] {
            let mut c = ComponentBuilder::new(name);
            c.fields.typed(port, FieldKind::Port(dir), "Bus", vec![]);
            ctx.add(c.build());
        }
        let mut top = ComponentBuilder::new("Top");
        let p = top.instance("p", "Producer", vec![]);
        let c = top.instance("c", "Consumer", vec![]);
        top.bind(subport(p, FieldId::from_raw(0)), subport(c, FieldId::from_raw(0)));
        ctx.add(top.build());

        let insts = resolve_all(&ctx);
        let render: Vec<_> = insts
            .iter()
            .flat_map(|i| i.connections.iter().map(|c| format!(".{}({})", c.port, c.signal)))
            .collect();
        assert_eq!(
            render,
            vec![
                ".out_valid(p_out_valid)",
                ".out_data(p_out_data)",
                ".inp_valid(p_out_valid)",
                ".inp_data(p_out_data)",
            ]
        );
        assert_eq!(insts[0].connections[1].ty.to_string(), "logic [7:0]");
    }

    #[test]
    fn extern_ports_by_name() {
        let mut ctx = Context::new();
        let mut ports = FieldsBuilder::default();
        ports.input("rst_n", 1);
        ports.output("q", 4);
        ctx.add(extern_module("pkg.Ram", Some("sky_ram"), ports));
        let mut top = ComponentBuilder::new("Top");
        let reset = top.fields.input("reset", 1);
        let q = top.fields.signal("q", 4);
        let ram = top.instance("ram", "pkg.Ram", vec![]);
        top.bind(py_attr(ram, "rst_n"), Expr::field(reset));
        top.bind(Expr::field(q), py_attr(ram, "q"));
        top.bind(py_attr(ram, "unknown"), Expr::int(0));
        top.bind(Expr::field(q), Expr::field(reset));
        ctx.add(top.build());

        let insts = resolve_all(&ctx);
        let inst = &insts[0];
        assert_eq!(inst.module, "sky_ram");
        let pairs: Vec<_> = inst
            .connections
            .iter()
            .map(|c| (c.port.as_str(), c.signal.as_str(), c.ty.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("rst_n", "reset", "logic".to_string()),
                ("q", "q", "logic [3:0]".to_string()),
                ("unknown", "0", "logic".to_string()),
            ]
        );
    }
}
