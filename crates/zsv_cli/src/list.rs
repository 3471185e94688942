//! `zsv list`: prints the file each component would produce.

use std::error::Error;
use std::path::Path;

use crate::pipeline::load_ir;

/// Runs the `zsv list` command.
pub fn run(ir: &str) -> Result<i32, Box<dyn Error>> {
    let ctx = load_ir(Path::new(ir))?;
    for file in zsv_codegen::plan(&ctx) {
        println!("{:<32} {}", file.file_name, file.component);
    }
    Ok(0)
}
