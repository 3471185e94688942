//! Mapping of arbitrary IR names onto SystemVerilog identifiers.

/// Turns `name` into a legal SystemVerilog identifier.
///
/// `.`, `<` and `>` become `__`, so a qualified name such as
/// `test_smoke.<locals>.Counter` reads `test_smoke__locals__Counter`. Any
/// other character outside `[A-Za-z0-9_]` becomes `_`, and a leading digit
/// gets a `_` prefix. The mapping is total and idempotent; module names and
/// output file stems both go through it so they always agree.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '.' | '<' | '>' => out.push_str("__"),
            c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
            _ => out.push('_'),
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Returns `true` if `text` is a plain identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
