//! SystemVerilog generation from the component IR.
//!
//! Every component type in a [`Context`] becomes one `.sv` file holding its
//! `module` and, for components with export fields, the `interface`s
//! carrying their tasks. Structures the generator cannot express degrade to
//! visible placeholders and warnings in the [`DiagnosticSink`]; only I/O on
//! the output directory and internal bugs produce `Err`.
//!
//! # Usage
//!
//! ```ignore
//! let sink = DiagnosticSink::new();
//! let written = generate(&ctx, &GenerateOptions::new("rtl"), &sink)?;
//! ```

#![warn(missing_docs)]

pub mod bind;
pub mod bundle;
pub mod context;
pub mod errors;
pub mod expr;
pub mod interface;
pub mod module;
pub mod ops;
pub mod options;
pub mod param;
pub mod sanitize;
pub mod stmt;
pub mod timing;
pub mod usage;
pub mod width;

pub use options::GenerateOptions;
pub use sanitize::sanitize;

use context::ComponentCx;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use zsv_common::{ContentHash, InternalError, ZsvResult};
use zsv_diagnostics::DiagnosticSink;
use zsv_ir::{ComponentType, Context};

/// Errors that stop a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The output directory could not be created.
    #[error("cannot create output directory `{path}`: {source}")]
    Io {
        /// The directory.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// A bug in the generator.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// The output file of one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Type-map name of the component.
    pub component: String,
    /// File name under the output directory.
    pub file_name: String,
}

/// Lists the files [`generate`] would write, in type-map order.
///
/// Bundles and externs produce no file.
pub fn plan(ctx: &Context) -> Vec<PlannedFile> {
    ctx.components()
        .map(|(name, _)| PlannedFile {
            component: name.to_string(),
            file_name: format!("{}.sv", sanitize(name)),
        })
        .collect()
}

/// Emits the SystemVerilog text of one component without touching the
/// file system.
#[tracing::instrument(skip_all, fields(component = %name))]
pub fn emit_component(
    ctx: &Context,
    name: &str,
    comp: &ComponentType,
    options: &GenerateOptions,
    sink: &DiagnosticSink,
) -> ZsvResult<String> {
    let cx = ComponentCx::new(ctx, name, comp, options, sink);
    let text = module::emit_module(&cx)?;
    tracing::trace!(bytes = text.len(), "emitted");
    Ok(text)
}

/// Generates one file per component under `options.output_dir`.
///
/// Components are emitted in parallel and written in type-map order. When
/// two components map to the same file, the later one is reported as `W309`
/// and skipped.
/// Returns the paths of every generated file, including ones left untouched
/// because their content did not change. A file that cannot be written is
/// reported as `E300` and the run continues.
#[tracing::instrument(skip_all, fields(out = %options.output_dir.display()))]
pub fn generate(
    ctx: &Context,
    options: &GenerateOptions,
    sink: &DiagnosticSink,
) -> Result<Vec<PathBuf>, GenerateError> {
    fs::create_dir_all(&options.output_dir).map_err(|source| GenerateError::Io {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut owners: HashMap<String, String> = HashMap::new();
    let mut shadowed: HashSet<String> = HashSet::new();
    for file in plan(ctx) {
        if let Some(first) = owners.get(&file.file_name) {
            sink.emit(errors::warn_file_collision(&file.file_name, first, &file.component));
            shadowed.insert(file.component);
        } else {
            owners.insert(file.file_name, file.component);
        }
    }

    let components: Vec<(&str, &ComponentType)> = ctx
        .components()
        .filter(|(name, _)| !shadowed.contains(*name))
        .collect();
    let emitted = components
        .par_iter()
        .map(|(name, comp)| {
            let text = emit_component(ctx, name, comp, options, sink)?;
            let path = options.output_dir.join(format!("{}.sv", sanitize(name)));
            Ok::<_, InternalError>((path, text))
        })
        .collect::<ZsvResult<Vec<_>>>()?;

    let mut written = Vec::with_capacity(emitted.len());
    for (path, text) in emitted {
        match write_if_changed(&path, &text, options.skip_unchanged) {
            Ok(changed) => {
                tracing::debug!(path = %path.display(), changed, "output file");
                written.push(path);
            }
            Err(e) => sink.emit(errors::error_write_failed(
                &path.display().to_string(),
                &e.to_string(),
            )),
        }
    }
    Ok(written)
}

/// Writes `text` to `path`; returns `false` if the file already held it.
fn write_if_changed(path: &Path, text: &str, skip_unchanged: bool) -> std::io::Result<bool> {
    if skip_unchanged && ContentHash::of_file(path)? == Some(ContentHash::of_text(text)) {
        return Ok(false);
    }
    fs::write(path, text)?;
    Ok(true)
}


#[cfg(test)]
mod tests {
    use super::*;
    use zsv_ir::builder::{extern_module, ComponentBuilder, FieldsBuilder, StructBuilder};

    fn context() -> Context {
        let mut ctx = Context::new();
        ctx.add(StructBuilder::new("Bus").build());
        ctx.add(extern_module("Ram", None, FieldsBuilder::default()));
        let mut a = ComponentBuilder::new("pkg.A");
        a.fields.input("clock", 1);
        ctx.add(a.build());
        ctx.add(ComponentBuilder::new("pkg<locals>B").build());
        ctx
    }

    #[test]
    fn plan_skips_bundles_and_externs() {
        let files: Vec<_> = plan(&context()).into_iter().map(|f| f.file_name).collect();
        assert_eq!(files, vec!["pkg__A.sv", "pkg__locals__B.sv"]);
    }

    #[test]
    fn writes_files_and_skips_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("rtl");
        let ctx = context();
        let sink = DiagnosticSink::new();
        let options = GenerateOptions::new(&out);

        let written = generate(&ctx, &options, &sink).unwrap();
        assert_eq!(written, vec![out.join("pkg__A.sv"), out.join("pkg__locals__B.sv")]);
        let text = fs::read_to_string(out.join("pkg__A.sv")).unwrap();
        assert!(text.starts_with("module pkg__A("));
        assert!(!sink.has_errors());

        let path = out.join("pkg__A.sv");
        assert!(!write_if_changed(&path, &text, true).unwrap());
        assert!(write_if_changed(&path, &text, false).unwrap());
        assert!(write_if_changed(&path, "changed", true).unwrap());
    }

    #[test]
    fn colliding_file_names_are_reported() {
        let mut ctx = Context::new();
        let mut first = ComponentBuilder::new("a.b");
        first.fields.input("from_first", 1);
        ctx.add(first.build());
        let mut second = ComponentBuilder::new("a<b");
        second.fields.input("from_second", 1);
        ctx.add(second.build());
        let dir = tempfile::tempdir().unwrap();
        let sink = DiagnosticSink::new();
        let written = generate(&ctx, &GenerateOptions::new(dir.path()), &sink).unwrap();
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, errors::W309);
        assert_eq!(written, vec![dir.path().join("a__b.sv")]);
        let text = fs::read_to_string(dir.path().join("a__b.sv")).unwrap();
        assert!(text.contains("from_first"));
        assert!(!text.contains("from_second"));
    }
}
