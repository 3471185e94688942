//! `zsv generate`: IR file in, `.sv` files out.
//!
//! 1. Read the IR
//! 2. Load `zsv.toml` and layer command-line flags over it
//! 3. Emit every component
//! 4. Render diagnostics

use std::error::Error;
use std::path::Path;

use zsv_codegen::GenerateOptions;
use zsv_config::ProjectConfig;
use zsv_diagnostics::DiagnosticSink;

use crate::pipeline::{load_ir, load_project_config, report};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `zsv generate` command.
///
/// Returns exit code 0 on success, 1 if errors were reported or warnings
/// were denied by configuration.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let ctx = load_ir(Path::new(&args.ir))?;
    let mut config = load_project_config(global)?;
    apply_overrides(&mut config, args);
    let options = GenerateOptions::from(&config.generator);

    let count = ctx.components().count();
    if !global.quiet {
        eprintln!(
            "   Generating {count} component(s) into {}",
            options.output_dir.display()
        );
    }

    let sink = DiagnosticSink::new();
    let written = zsv_codegen::generate(&ctx, &options, &sink)?;
    let summary = report(sink.take_all(), &config, global);

    if !global.quiet {
        eprintln!(
            "   Finished {} file(s): {} error(s), {} warning(s)",
            written.len(),
            summary.errors,
            summary.warnings
        );
    }
    Ok(summary.exit_code)
}

/// Layers command-line flags over the loaded configuration.
fn apply_overrides(config: &mut ProjectConfig, args: &GenerateArgs) {
    let generator = &mut config.generator;
    if let Some(dir) = &args.output {
        generator.output_dir = dir.clone();
    }
    if args.debug_locations {
        generator.debug_locations = true;
    }
    if args.no_trace {
        generator.trace_tasks = false;
    }
    if args.force {
        generator.skip_unchanged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(extra: &[&str]) -> GenerateArgs {
        use clap::Parser;
        let mut argv = vec!["zsv", "generate", "ir.json"];
        argv.extend_from_slice(extra);
        match crate::Cli::parse_from(argv).command {
            crate::Command::Generate(args) => args,
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config =
            zsv_config::load_config_from_str("[generator]\noutput_dir = \"build/sv\"\n").unwrap();
        apply_overrides(&mut config, &parse_args(&[]));
        assert_eq!(config.generator.output_dir, "build/sv");
        assert!(config.generator.trace_tasks);

        apply_overrides(&mut config, &parse_args(&["-o", "gen", "--no-trace", "--force"]));
        assert_eq!(config.generator.output_dir, "gen");
        assert!(!config.generator.trace_tasks);
        assert!(!config.generator.skip_unchanged);
        assert!(!config.generator.debug_locations);
    }

    #[test]
    fn generates_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let ir = dir.path().join("ir.json");
        let mut ctx = zsv_ir::Context::new();
        let mut b = zsv_ir::builder::ComponentBuilder::new("Top");
        b.fields.input("clock", 1);
        ctx.add(b.build());
        std::fs::write(&ir, serde_json::to_string(&ctx).unwrap()).unwrap();

        let out = dir.path().join("rtl");
        let mut args = parse_args(&[]);
        args.ir = ir.display().to_string();
        args.output = Some(out.display().to_string());
        let config_path = dir.path().join("zsv.toml");
        std::fs::write(&config_path, "").unwrap();
        let global = GlobalArgs {
            quiet: true,
            color: false,
            format: None,
            config: Some(config_path.display().to_string()),
        };

        assert_eq!(run(&args, &global).unwrap(), 0);
        let text = std::fs::read_to_string(out.join("Top.sv")).unwrap();
        assert!(text.contains("input logic clock"));
    }
}
