//! Generation options.

use std::path::PathBuf;
use zsv_config::GeneratorConfig;

/// Settings for one [`generate`](crate::generate) run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory receiving the `.sv` files; created if absent.
    pub output_dir: PathBuf,
    /// Emit `// file:line` comments before modules and processes.
    pub debug_locations: bool,
    /// Emit `$display` traces in interface tasks.
    pub trace_tasks: bool,
    /// Skip rewriting files whose content is unchanged.
    pub skip_unchanged: bool,
}

impl GenerateOptions {
    /// Default options writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            debug_locations: false,
            trace_tasks: true,
            skip_unchanged: true,
        }
    }
}

impl From<&GeneratorConfig> for GenerateOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            debug_locations: config.debug_locations,
            trace_tasks: config.trace_tasks,
            skip_unchanged: config.skip_unchanged,
        }
    }
}
