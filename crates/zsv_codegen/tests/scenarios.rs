//! End-to-end emission of representative components.

use zsv_codegen::{emit_component, errors, generate, GenerateOptions};
use zsv_diagnostics::{Diagnostic, DiagnosticSink};
use zsv_ir::builder::{subport, ComponentBuilder, StructBuilder};
use zsv_ir::{
    Arg, BinOp, Context, DataType, Expr, FieldId, FieldKind, Function, PortDirection, Stmt,
    UnaryOp,
};
use zsv_source::SourceLoc;

fn emit_with(ctx: &Context, name: &str, options: &GenerateOptions) -> (String, Vec<Diagnostic>) {
    let (key, comp) = ctx
        .components()
        .find(|(key, _)| *key == name)
        .expect("component");
    let sink = DiagnosticSink::new();
    let text = emit_component(ctx, key, comp, options, &sink).expect("emission");
    (text, sink.take_all())
}

fn emit(ctx: &Context, name: &str) -> (String, Vec<Diagnostic>) {
    emit_with(ctx, name, &GenerateOptions::new("out"))
}

fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::Assign {
        targets: vec![target],
        value,
    }
}

fn wait_clock(clock: FieldId) -> Stmt {
    Stmt::Expr(Expr::await_call("zdc.posedge", vec![Expr::field(clock)]))
}

fn counter() -> Context {
    let mut ctx = Context::new();
    let mut b = ComponentBuilder::new("Counter");
    let clock = b.fields.input("clock", 1);
    let reset = b.fields.input("reset", 1);
    let count = b.fields.output("count", 32);
    b.sync_process(
        Function {
            body: vec![Stmt::If {
                test: Expr::field(reset),
                body: vec![assign(Expr::field(count), Expr::int(0))],
                orelse: vec![Stmt::AugAssign {
                    target: Expr::field(count),
                    op: BinOp::Add,
                    value: Expr::int(1),
                }],
            }],
            ..Function::new("count_p")
        },
        Some(clock),
        Some(reset),
    );
    ctx.add(b.build());
    ctx
}

#[test]
fn counter_module() {
    let (text, diags) = emit(&counter(), "Counter");
    assert_eq!(
        text,
        "\
module Counter(
  input logic clock,
  input logic reset,
  output logic [31:0] count
);

  always @(posedge clock or posedge reset) begin
    if (reset) begin
      count <= 0;
    end else begin
      count <= count + 1;
    end
  end
endmodule
"
    );
    assert!(diags.is_empty());
}

#[test]
fn parameters_and_overrides() {
    let mut ctx = Context::new();
    let mut c = ComponentBuilder::new("MyC");
    let dw = c.fields.param("DATA_WIDTH", 32);
    let aw = c.fields.param("ADDR_WIDTH", 64);
    let clk = c.fields.input("clock", 1);
    c.fields
        .port_width("data", PortDirection::Input, Expr::field(dw));
    c.fields
        .port_width("addr", PortDirection::Input, Expr::field(aw));
    ctx.add(c.build());

    let mut top = ComponentBuilder::new("Top");
    let w = top.fields.param("DATA_WIDTH", 12);
    let clock = top.fields.input("clock", 1);
    let c3 = top.instance(
        "c3",
        "MyC",
        vec![("DATA_WIDTH", Expr::bin(Expr::field(w), BinOp::Add, Expr::int(4)))],
    );
    let c4 = top.instance("c4", "MyC", vec![("DATA_WIDTH", Expr::int(16))]);
    top.bind(subport(c3, clk), Expr::field(clock));
    top.bind(subport(c4, clk), Expr::field(clock));
    top.bind(subport(c3, FieldId::from_raw(3)), subport(c4, FieldId::from_raw(3)));
    ctx.add(top.build());

    let (child, _) = emit(&ctx, "MyC");
    assert!(child.starts_with(
        "module MyC #(\n  parameter int DATA_WIDTH = 32,\n  parameter int ADDR_WIDTH = 64\n) (\n"
    ));
    assert!(child.contains("  input logic [(DATA_WIDTH-1):0] data,\n"));
    assert!(child.contains("  input logic [(ADDR_WIDTH-1):0] addr\n);"));

    let (top, diags) = emit(&ctx, "Top");
    assert!(top.contains("  MyC #(.DATA_WIDTH(DATA_WIDTH+4)) c3 (\n    .clock(clock),\n    .data(c3_data)\n  );"));
    assert!(top.contains("  MyC #(.DATA_WIDTH(16)) c4 (\n    .clock(clock),\n    .data(c3_data)\n  );"));
    assert!(top.contains("  logic [(DATA_WIDTH+4-1):0] c3_data;\n"));
    assert!(diags.is_empty(), "{diags:?}");
}

fn bus_context() -> Context {
    let mut ctx = Context::new();
    let mut bus = StructBuilder::new("Bus");
    let bw = bus.fields.param("BUS_WIDTH", 8);
    bus.fields.port("valid", PortDirection::Output, 1);
    bus.fields
        .port_width("data", PortDirection::Output, Expr::field(bw));
    ctx.add(bus.build());

    let mut producer = ComponentBuilder::new("Producer");
    let pw = producer.fields.param("BUS_WIDTH", 8);
    producer.fields.typed(
        "out",
        FieldKind::Port(PortDirection::Output),
        "Bus",
        vec![("BUS_WIDTH", Expr::field(pw))],
    );
    ctx.add(producer.build());

    let mut consumer = ComponentBuilder::new("Consumer");
    consumer
        .fields
        .typed("inp", FieldKind::Port(PortDirection::Input), "Bus", vec![]);
    ctx.add(consumer.build());

    let mut top = ComponentBuilder::new("Top");
    let p = top.instance("p", "Producer", vec![("BUS_WIDTH", Expr::int(32))]);
    let c = top.instance("c", "Consumer", vec![]);
    top.bind(subport(p, FieldId::from_raw(1)), subport(c, FieldId::from_raw(0)));
    ctx.add(top.build());
    ctx
}

#[test]
fn bundle_ports_are_flattened() {
    let ctx = bus_context();
    let (producer, _) = emit(&ctx, "Producer");
    assert!(producer.contains("  output logic out_valid,\n"));
    assert!(producer.contains("  output logic [(BUS_WIDTH-1):0] out_data\n"));

    let (top, _) = emit(&ctx, "Top");
    let connections: Vec<&str> = top
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with(".out_") || l.starts_with(".inp_"))
        .collect();
    assert_eq!(
        connections,
        vec![
            ".out_valid(p_out_valid),",
            ".out_data(p_out_data)",
            ".inp_valid(p_out_valid),",
            ".inp_data(p_out_data)",
        ]
    );
    assert!(top.contains("  logic p_out_valid;\n"));
    assert!(top.contains("  logic [31:0] p_out_data;\n"));
}

fn xtor_context() -> Context {
    let mut ctx = Context::new();
    let mut dut = ComponentBuilder::new("Dut");
    let d_clock = dut.fields.input("clock", 1);
    let d_data_i = dut.fields.input("data_i", 32);
    let d_valid = dut.fields.input("valid", 1);
    let d_ready = dut.fields.output("ready", 1);
    let d_data_o = dut.fields.output("data_o", 32);
    ctx.add(dut.build());

    let mut x = ComponentBuilder::new("X");
    let clock = x.fields.input("clock", 1);
    let reset = x.fields.input("reset", 1);
    let data_i = x.fields.signal("data_i", 32);
    let valid = x.fields.signal("valid", 1);
    let ready = x.fields.signal("ready", 1);
    let data_o = x.fields.signal("data_o", 32);
    x.fields.signal("busy", 1);
    let inst = x.instance("dut", "Dut", vec![]);
    let xif = x.export("xtor_if", "XtorIf");
    for (port, sig) in [
        (d_clock, clock),
        (d_data_i, data_i),
        (d_valid, valid),
        (d_ready, ready),
        (d_data_o, data_o),
    ] {
        x.bind(subport(inst, port), Expr::field(sig));
    }
    x.function(Function {
        name: "send".into(),
        args: vec![Arg {
            name: "data".into(),
            datatype: Some(DataType::uint(32)),
        }],
        returns: vec![DataType::uint(32)],
        is_async: true,
        body: vec![
            wait_clock(clock),
            Stmt::While {
                test: Expr::field(reset),
                body: vec![wait_clock(clock)],
            },
            assign(Expr::field(data_i), Expr::local("data")),
            assign(Expr::field(valid), Expr::int(1)),
            wait_clock(clock),
            Stmt::While {
                test: Expr::unary(UnaryOp::Not, Expr::field(ready)),
                body: vec![wait_clock(clock)],
            },
            assign(Expr::field(valid), Expr::int(0)),
            assign(Expr::local("result"), Expr::field(data_o)),
            Stmt::Return(Some(Expr::local("result"))),
        ],
        ..Function::new("send")
    });
    x.bind_method(xif, "send", "send");
    ctx.add(x.build());
    ctx
}

#[test]
fn exported_method_becomes_interface_task() {
    let (text, diags) = emit(&xtor_context(), "X");
    assert!(diags.is_empty(), "{diags:?}");

    let iface_end = text.find("endinterface").expect("interface");
    let module_start = text.find("module X(").expect("module");
    assert!(iface_end < module_start);
    let iface = &text[..iface_end];
    assert!(iface.starts_with("interface X_xtor_if;\n"));
    assert_eq!(iface.matches("task send(").count(), 1);
    assert!(iface.contains("  task send(input logic [31:0] data, output logic [31:0] __ret);\n"));
    assert!(iface.matches("@(posedge clock);").count() >= 2);
    for line in [
        "while (reset) begin",
        "while (!ready) begin",
        "data_i = data;",
        "valid = 1;",
        "result = data_o;",
        "__ret = result;",
    ] {
        assert!(iface.contains(line), "missing `{line}`");
    }
    assert!(iface.contains("  logic [31:0] data_i = '0;\n"));
    assert!(iface.contains("  logic ready;\n"));
    assert!(iface.contains("    logic [31:0] result;\n"));

    let module = &text[module_start..];
    assert!(module.contains("  logic [31:0] data_i;\n"));
    assert!(module.contains("  logic busy = '0;\n"));
    assert!(module.contains("  X_xtor_if xtor_if();\n"));
    assert!(module.contains("  assign data_i = xtor_if.data_i;\n"));
    assert!(module.contains("  assign xtor_if.ready = ready;\n"));
    assert!(!module.contains("initial"));
    assert!(module.ends_with("endmodule\n"));
}

#[test]
fn free_running_process_and_debug_locations() {
    let mut ctx = Context::new();
    let mut b = ComponentBuilder::new("Tb");
    let clock = b.fields.signal("clock", 1);
    b.source_loc(SourceLoc::new("tb.py", 12));
    b.function(Function {
        is_async: true,
        source_loc: Some(SourceLoc::new("tb.py", 20)),
        body: vec![Stmt::While {
            test: Expr::Constant(zsv_ir::ConstValue::Bool(true)),
            body: vec![
                assign(Expr::field(clock), Expr::int(0)),
                Stmt::Expr(Expr::await_call(
                    "zdc.wait",
                    vec![Expr::call("zdc.ns", vec![Expr::int(5)])],
                )),
                assign(Expr::field(clock), Expr::int(1)),
                Stmt::Expr(Expr::await_call(
                    "zdc.wait",
                    vec![Expr::call("zdc.ns", vec![Expr::int(5)])],
                )),
            ],
        }],
        ..Function::new("clkgen")
    });
    b.function(Function::new("helper"));
    ctx.add(b.build());

    let mut options = GenerateOptions::new("out");
    options.debug_locations = true;
    let (text, diags) = emit_with(&ctx, "Tb", &options);
    assert!(diags.is_empty(), "{diags:?}");
    assert!(text.starts_with("// tb.py:12\nmodule Tb(\n);\n"));
    assert!(text.contains("  // tb.py:20\n  initial begin : clkgen\n    while (1) begin\n      clock = 0;\n      #5ns;\n"));
    assert!(!text.contains("helper"));
    assert!(!text.contains("$display"));
}

#[test]
fn degraded_shapes_stay_visible() {
    let mut ctx = Context::new();
    let mut b = ComponentBuilder::new("Odd");
    let q = b.fields.output("q", 8);
    b.instance("ghost", "Missing", vec![]);
    b.sync_process(
        Function {
            body: vec![
                assign(
                    Expr::field(q),
                    Expr::bin(Expr::field(q), BinOp::Pow, Expr::int(2)),
                ),
                Stmt::Expr(Expr::call("print", vec![])),
            ],
            ..Function::new("odd_p")
        },
        None,
        None,
    );
    ctx.add(b.build());

    let (text, diags) = emit(&ctx, "Odd");
    assert!(text.contains("  always @(/* no clock or reset */) begin\n"));
    assert!(text.contains("    q <= /* unsupported: (self.<0> ** 2) */;\n"));
    assert!(text.contains("    /* unsupported: print() */\n"));
    assert!(!text.contains("ghost"));
    let codes: Vec<_> = diags.iter().map(|d| d.code).collect();
    for code in [errors::W300, errors::W303, errors::W305, errors::W308] {
        assert!(codes.contains(&code), "missing {code}");
    }
    assert!(diags.iter().all(|d| d.component.as_deref() == Some("Odd")));
}

#[test]
fn cyclic_bundles_and_oversized_widths_degrade() {
    let mut ctx = Context::new();
    let mut node = StructBuilder::new("Node");
    node.fields.port("valid", PortDirection::Input, 1);
    node.fields.typed("next", FieldKind::Plain, "Node", vec![]);
    ctx.add(node.build());
    let mut b = ComponentBuilder::new("Chain");
    b.fields
        .port_width("wide", PortDirection::Input, Expr::int(1 << 32));
    b.bundle("head", "Node", vec![]);
    ctx.add(b.build());

    let (text, diags) = emit(&ctx, "Chain");
    assert!(text.contains(
        "  input logic [(4294967296-1):0] wide,\n  input logic head_valid\n);\n"
    ));
    assert!(text.contains("  logic head_next;\n"));
    assert_eq!(diags.len(), 1, "{diags:?}");
    assert_eq!(diags[0].code, errors::W301);
}

#[test]
fn json_round_trip_generates_identical_files() {
    let ctx = xtor_context();
    let json = serde_json::to_string(&ctx).unwrap();
    let back: Context = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ctx);

    let dir = tempfile::tempdir().unwrap();
    let sink = DiagnosticSink::new();
    let written = generate(&back, &GenerateOptions::new(dir.path()), &sink).unwrap();
    assert_eq!(written.len(), 2);
    let text = std::fs::read_to_string(dir.path().join("X.sv")).unwrap();
    assert_eq!(text, emit(&ctx, "X").0);
}
