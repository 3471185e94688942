//! Configuration types deserialized from `zsv.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level configuration parsed from `zsv.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Code generation settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Diagnostic reporting settings.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Settings that change the emitted SystemVerilog.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory receiving one `.sv` file per component.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Emit `// file:line` comments before modules and processes.
    #[serde(default)]
    pub debug_locations: bool,
    /// Emit `$display` entry/exit/iteration traces in task bodies.
    #[serde(default = "default_true")]
    pub trace_tasks: bool,
    /// Leave files whose content would not change untouched.
    #[serde(default = "default_true")]
    pub skip_unchanged: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            debug_locations: false,
            trace_tasks: true,
            skip_unchanged: true,
        }
    }
}

fn default_output_dir() -> String {
    "rtl".to_string()
}

fn default_true() -> bool {
    true
}

/// Diagnostic output settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Output format for rendered diagnostics.
    #[serde(default)]
    pub format: DiagnosticFormat,
    /// Treat any warning as a failure of the run.
    #[serde(default)]
    pub deny_warnings: bool,
    /// Warning codes to suppress (e.g. `"W305"` or `["W305", "W306"]`).
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub allow: Vec<String>,
}

/// How diagnostics are printed.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticFormat {
    /// Human-readable terminal output (default).
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
