//! Diagnostic creation, severity management, and rendering.
//!
//! Generation never aborts on a malformed IR fragment. Instead the affected
//! piece of output degrades to a visible placeholder and a [`Diagnostic`] is
//! pushed into the thread-safe [`DiagnosticSink`]. Callers render the
//! collected diagnostics with a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
