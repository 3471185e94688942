//! Steps shared by the subcommands: reading inputs and reporting results.

use std::error::Error;
use std::path::Path;

use zsv_config::{DiagnosticFormat, ProjectConfig};
use zsv_diagnostics::{Diagnostic, DiagnosticRenderer, JsonRenderer, Severity, TerminalRenderer};
use zsv_ir::Context;

use crate::{GlobalArgs, ReportFormat};

/// Reads a JSON-serialized IR from `path`.
pub fn load_ir(path: &Path) -> Result<Context, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read IR file `{}`: {e}", path.display()))?;
    let ctx: Context = serde_json::from_str(&text)
        .map_err(|e| format!("invalid IR in `{}`: {e}", path.display()))?;
    tracing::debug!(types = ctx.types.len(), path = %path.display(), "loaded IR");
    Ok(ctx)
}

/// Loads `--config` if given, else `zsv.toml` from the working directory.
pub fn load_project_config(global: &GlobalArgs) -> Result<ProjectConfig, Box<dyn Error>> {
    let config = match &global.config {
        Some(path) => zsv_config::load_config_file(Path::new(path))?,
        None => zsv_config::load_config(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Outcome of reporting a batch of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Reported errors.
    pub errors: usize,
    /// Reported warnings.
    pub warnings: usize,
    /// Process exit code.
    pub exit_code: i32,
}

/// Drops warnings whose code is listed in `allow`.
pub fn filter_allowed(diagnostics: Vec<Diagnostic>, allow: &[String]) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .filter(|d| d.severity != Severity::Warning || !allow.contains(&d.code.to_string()))
        .collect()
}

/// Renders diagnostics to stderr and computes the exit code.
pub fn report(
    diagnostics: Vec<Diagnostic>,
    config: &ProjectConfig,
    global: &GlobalArgs,
) -> Summary {
    let diagnostics = filter_allowed(diagnostics, &config.diagnostics.allow);
    let format = match (global.format, config.diagnostics.format) {
        (Some(format), _) => format,
        (None, DiagnosticFormat::Text) => ReportFormat::Text,
        (None, DiagnosticFormat::Json) => ReportFormat::Json,
    };
    let renderer: Box<dyn DiagnosticRenderer> = match format {
        ReportFormat::Text => Box::new(TerminalRenderer::new(global.color)),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    for diag in &diagnostics {
        if global.quiet && diag.severity != Severity::Error {
            continue;
        }
        eprint!("{}", renderer.render(diag));
    }
    summarize(&diagnostics, config.diagnostics.deny_warnings)
}

fn summarize(diagnostics: &[Diagnostic], deny_warnings: bool) -> Summary {
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    let failed = errors > 0 || (deny_warnings && warnings > 0);
    Summary {
        errors,
        warnings,
        exit_code: i32::from(failed),
    }
}
