//! Diagnostic codes and helper functions for generation warnings.
//!
//! Codes `W300`--`W309` cover IR fragments the generator could not translate
//! faithfully. Each one corresponds to a visible fallback in the emitted
//! text: a placeholder comment, a 1-bit default type, a skipped declaration
//! or a placeholder parameter name. `E300` covers output files that could not
//! be written.

use zsv_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Expression with no SystemVerilog rendering.
pub const W300: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 300,
};

/// Field type could not be mapped to a bit vector.
pub const W301: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 301,
};

/// Width or parameter-override expression could not be evaluated symbolically.
pub const W302: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 302,
};

/// Statement kind not supported in this kind of process.
pub const W303: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 303,
};

/// Field reference points past the end of a field list.
pub const W304: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 304,
};

/// Sync process without clock or reset metadata.
pub const W305: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 305,
};

/// `await` on something other than an edge or a delay.
pub const W306: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 306,
};

/// Export field with no method bound to it.
pub const W307: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 307,
};

/// Instance or bundle field whose type is not in the context.
pub const W308: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 308,
};

/// Two components map to the same output file.
pub const W309: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 309,
};

/// An output file could not be written.
pub const E300: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 300,
};

/// Creates a diagnostic for an expression rendered as a placeholder.
pub fn warn_unsupported_expr(echo: &str) -> Diagnostic {
    Diagnostic::warning(W300, format!("expression `{echo}` has no SystemVerilog form"))
        .with_note("a placeholder comment was emitted in its place")
}

/// Creates a diagnostic for a field whose type fell back to a single bit.
pub fn warn_unresolved_type(field: &str, type_desc: &str) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!("type `{type_desc}` of `{field}` is not a bit vector"),
    )
    .with_note("declared as a single-bit `logic`")
}

/// Creates a diagnostic for a bundle member whose type contains itself.
pub fn warn_recursive_bundle(member: &str, bundle: &str) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!("member `{member}` nests bundle `{bundle}` inside itself"),
    )
    .with_note("declared as a single-bit `logic`")
}

/// Creates a diagnostic for a parameter declared without a default.
pub fn warn_missing_default(param: &str) -> Diagnostic {
    Diagnostic::warning(W302, format!("parameter `{param}` has no default value"))
        .with_note("declared with default `0`")
}

/// Creates a diagnostic for a failed symbolic parameter evaluation.
pub fn warn_param_eval(what: &str, echo: &str, reason: &str) -> Diagnostic {
    Diagnostic::warning(W302, format!("cannot evaluate {what} `{echo}`: {reason}"))
        .with_help("width and parameter expressions may only use parameters, integers and arithmetic")
}

/// Creates a diagnostic for a statement dropped from a process.
pub fn warn_unsupported_stmt(kind: &str, process: &str, context: &str) -> Diagnostic {
    Diagnostic::warning(
        W303,
        format!("`{kind}` is not supported in {context} `{process}`"),
    )
    .with_note("a placeholder comment was emitted in its place")
}

/// Creates a diagnostic for a dangling field reference.
pub fn warn_dangling_field(echo: &str) -> Diagnostic {
    Diagnostic::warning(W304, format!("field reference `{echo}` does not resolve"))
}

/// Creates a diagnostic for a sync process with an empty sensitivity list.
pub fn warn_no_sensitivity(process: &str) -> Diagnostic {
    Diagnostic::warning(
        W305,
        format!("sync process `{process}` has no clock or reset"),
    )
    .with_help("set `clock` and `reset` metadata on the process")
}

/// Creates a diagnostic for an unrecognized suspension point.
pub fn warn_unrecognized_suspend(echo: &str) -> Diagnostic {
    Diagnostic::warning(W306, format!("cannot translate `{echo}`"))
        .with_help("only `await posedge(signal)` and `await wait(duration)` are supported")
}

/// Creates a diagnostic for an export field with no bound method.
pub fn warn_unbound_export(field: &str) -> Diagnostic {
    Diagnostic::warning(W307, format!("export `{field}` has no bound method"))
        .with_note("no interface was generated for it")
}

/// Creates a diagnostic for an instance of an unknown type.
pub fn warn_unknown_type(field: &str, type_name: &str) -> Diagnostic {
    Diagnostic::warning(
        W308,
        format!("type `{type_name}` of `{field}` is not defined"),
    )
    .with_note("the field was skipped")
}

/// Creates a diagnostic for an output file name shared by two components.
pub fn warn_file_collision(file: &str, first: &str, second: &str) -> Diagnostic {
    Diagnostic::warning(
        W309,
        format!("components `{first}` and `{second}` both generate `{file}`"),
    )
    .with_note("the later component was not generated")
}

/// Creates a diagnostic for an output file that could not be written.
pub fn error_write_failed(file: &str, reason: &str) -> Diagnostic {
    Diagnostic::error(E300, format!("cannot write `{file}`: {reason}"))
}
