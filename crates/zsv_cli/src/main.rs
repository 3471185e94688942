//! zsv CLI: generates SystemVerilog from a serialized component IR.
//!
//! Provides `zsv generate` to write one `.sv` file per component and
//! `zsv list` to preview which files a run would produce.

#![warn(missing_docs)]

mod generate;
mod list;
mod pipeline;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// zsv: SystemVerilog backend for the component IR.
#[derive(Parser, Debug)]
#[command(name = "zsv", version, about = "SystemVerilog generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Diagnostic output format; overrides `zsv.toml`.
    #[arg(long, global = true, value_enum)]
    pub format: Option<ReportFormat>,

    /// Path to a custom `zsv.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate SystemVerilog files from an IR file.
    Generate(GenerateArgs),
    /// List the files a generation run would produce.
    List {
        /// IR file in JSON form.
        ir: String,
    },
}

/// Arguments for the `zsv generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// IR file in JSON form.
    pub ir: String,

    /// Output directory; overrides `generator.output_dir`.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Emit `// file:line` comments before modules and processes.
    #[arg(long)]
    pub debug_locations: bool,

    /// Omit `$display` traces from interface tasks.
    #[arg(long)]
    pub no_trace: bool,

    /// Rewrite every file even if its content is unchanged.
    #[arg(long)]
    pub force: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Diagnostic format requested on the command line.
    pub format: Option<ReportFormat>,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        format: cli.format,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::List { ref ir } => list::run(ir),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generate_default() {
        let cli = Cli::parse_from(["zsv", "generate", "design.json"]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.ir, "design.json");
                assert!(args.output.is_none());
                assert!(!args.debug_locations);
                assert!(!args.no_trace);
                assert!(!args.force);
            }
            _ => panic!("expected Generate command"),
        }
        assert!(cli.format.is_none());
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "zsv",
            "generate",
            "design.json",
            "-o",
            "rtl/gen",
            "--debug-locations",
            "--no-trace",
            "--force",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.output.as_deref(), Some("rtl/gen"));
                assert!(args.debug_locations);
                assert!(args.no_trace);
                assert!(args.force);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from(["zsv", "list", "design.json"]);
        match cli.command {
            Command::List { ref ir } => assert_eq!(ir, "design.json"),
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "zsv",
            "--quiet",
            "--color",
            "never",
            "--format",
            "json",
            "list",
            "d.json",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.format, Some(ReportFormat::Json));
    }

    #[test]
    fn parse_config_after_subcommand() {
        let cli = Cli::parse_from(["zsv", "generate", "d.json", "--config", "/tmp/zsv.toml", "-v"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/zsv.toml"));
        assert!(cli.verbose);
    }
}
