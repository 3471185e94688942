//! Flattening of bundle-typed fields into individual signals.

use crate::context::ComponentCx;
use crate::errors;
use crate::param::ParamScope;
use crate::sanitize::sanitize;
use crate::width::{self, SvType};
use zsv_ir::{DataType, Field, PortDirection};

/// One member signal of a flattened bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatSignal {
    /// `<field>_<member>`.
    pub name: String,
    /// The part after the field name, `<member>` or `<member>_<sub>`.
    pub suffix: String,
    /// The member's declared direction, if any.
    pub direction: Option<PortDirection>,
    /// Member type with bundle parameters substituted.
    pub ty: SvType,
}

/// Returns the bundle type of `field`, if it has one.
pub fn bundle_type<'a>(cx: &ComponentCx<'a>, field: &'a Field) -> Option<&'a zsv_ir::StructType> {
    match cx.field_type(field)? {
        DataType::Struct(st) => Some(st),
        _ => None,
    }
}

/// Flattens the bundle-typed `field`, declared in `scope`, into member
/// signals named after `prefix`.
///
/// Member widths are rendered in the declaring namespace: bundle parameters
/// take the field's overrides, or the bundle's declared defaults. Const
/// members are parameters of the bundle and produce no signal. A member
/// whose bundle type is already being flattened degrades to a single bit
/// and is reported. Returns `None` if `field` is not a bundle.
pub fn flatten(
    cx: &ComponentCx<'_>,
    prefix: &str,
    field: &Field,
    scope: &ParamScope<'_>,
) -> Option<Vec<FlatSignal>> {
    flatten_within(cx, prefix, field, scope, &mut Vec::new())
}

/// `open` holds the bundle types on the path from the outermost field.
fn flatten_within(
    cx: &ComponentCx<'_>,
    prefix: &str,
    field: &Field,
    scope: &ParamScope<'_>,
    open: &mut Vec<String>,
) -> Option<Vec<FlatSignal>> {
    let bundle = bundle_type(cx, field)?;
    open.push(bundle.name.clone());
    let inner = scope.nested(cx, field, &bundle.fields);
    let mut out = Vec::new();
    for member in bundle.fields.values().filter(|m| !m.is_const) {
        let member_name = sanitize(&member.name);
        let name = format!("{prefix}_{member_name}");
        if let Some(cyclic) = bundle_type(cx, member).filter(|st| open.contains(&st.name)) {
            cx.report(errors::warn_recursive_bundle(&member.name, &cyclic.name));
            out.push(FlatSignal {
                ty: SvType::BIT,
                direction: member.direction(),
                suffix: member_name,
                name,
            });
            continue;
        }
        if let Some(nested) = flatten_within(cx, &name, member, &inner, open) {
            out.extend(nested.into_iter().map(|sig| FlatSignal {
                suffix: format!("{member_name}_{}", sig.suffix),
                direction: sig.direction.or(member.direction()),
                ..sig
            }));
            continue;
        }
        out.push(FlatSignal {
            ty: width::field_type_or_bit(cx, member, &inner),
            direction: member.direction(),
            suffix: member_name,
            name,
        });
    }
    open.pop();
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_cx;
    use zsv_ir::builder::{ComponentBuilder, StructBuilder};
    use zsv_ir::{BinOp, Context, Expr};

    fn context() -> Context {
        let mut ctx = Context::new();
        let mut bus = StructBuilder::new("Bus");
        let bw = bus.fields.param("BUS_WIDTH", 16);
        bus.fields.port("valid", PortDirection::Output, 1);
        bus.fields.port_width("data", PortDirection::Output, Expr::field(bw));
        bus.fields.port("ready", PortDirection::Input, 1);
        ctx.add(bus.build());

        let mut pair = StructBuilder::new("Pair");
        pair.fields.typed("req", zsv_ir::FieldKind::Plain, "Bus", vec![]);
        ctx.add(pair.build());

        let mut top = ComponentBuilder::new("Top");
        let w = top.fields.param("WIDTH", 32);
        top.bundle(
            "bus",
            "Bus",
            vec![("BUS_WIDTH", Expr::bin(Expr::field(w), BinOp::Add, Expr::int(4)))],
        );
        top.bundle("plain", "Bus", vec![]);
        top.bundle("pair", "Pair", vec![]);
        top.fields.signal("x", 1);
        ctx.add(top.build());
        ctx
    }

    fn flat(ctx: &Context, name: &str) -> Option<Vec<FlatSignal>> {
        with_cx(ctx, "Top", |cx, _| {
            let (_, field) = cx.comp.field_by_name(name)?;
            flatten(cx, name, field, &ParamScope::owner(&cx.comp.fields))
        })
    }

    #[test]
    fn members_in_order_with_overrides() {
        let ctx = context();
        let sigs = flat(&ctx, "bus").unwrap();
        let names: Vec<_> = sigs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["bus_valid", "bus_data", "bus_ready"]);
        assert_eq!(sigs[1].ty.decl(&sigs[1].name), "logic [(WIDTH+4-1):0] bus_data");
        assert_eq!(sigs[1].direction, Some(PortDirection::Output));
        assert_eq!(sigs[2].suffix, "ready");
    }

    #[test]
    fn defaults_without_overrides() {
        let ctx = context();
        let sigs = flat(&ctx, "plain").unwrap();
        assert_eq!(sigs[1].ty.decl("d"), "logic [15:0] d");
    }

    #[test]
    fn nested_bundles() {
        let ctx = context();
        let sigs = flat(&ctx, "pair").unwrap();
        assert_eq!(sigs[0].name, "pair_req_valid");
        assert_eq!(sigs[0].suffix, "req_valid");
        assert!(flat(&ctx, "x").is_none());
    }

    #[test]
    fn self_containing_bundle_degrades_to_a_bit() {
        let mut ctx = Context::new();
        let mut node = StructBuilder::new("Node");
        node.fields.port("valid", PortDirection::Output, 1);
        node.fields.typed("next", zsv_ir::FieldKind::Plain, "Node", vec![]);
        ctx.add(node.build());
        let mut outer = StructBuilder::new("Outer");
        outer.fields.typed("head", zsv_ir::FieldKind::Plain, "Node", vec![]);
        ctx.add(outer.build());
        let mut top = ComponentBuilder::new("List");
        top.bundle("list", "Outer", vec![]);
        ctx.add(top.build());

        with_cx(&ctx, "List", |cx, sink| {
            let (_, field) = cx.comp.field_by_name("list").unwrap();
            let sigs = flatten(cx, "list", field, &ParamScope::owner(&cx.comp.fields)).unwrap();
            let names: Vec<_> = sigs.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["list_head_valid", "list_head_next"]);
            assert_eq!(sigs[1].ty, SvType::BIT);
            let diags = sink.diagnostics();
            assert_eq!(diags.len(), 1);
            assert_eq!(diags[0].code, errors::W301);
            assert!(diags[0].message.contains("Node"));
        });
    }
}
