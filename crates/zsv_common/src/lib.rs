//! Shared foundational types used across the zsv SystemVerilog generator.
//!
//! This crate provides the internal-error result type and content hashing
//! of generated text.

#![warn(missing_docs)]

pub mod hash;
pub mod result;

pub use hash::ContentHash;
pub use result::{InternalError, ZsvResult};
