//! Source locations carried by the IR back to the front-end description.
//!
//! The generator never reads source text. It only needs the file and line a
//! component or process was declared at, for debug comments in emitted
//! SystemVerilog and for diagnostic locations.

#![warn(missing_docs)]

pub mod loc;

pub use loc::SourceLoc;
