use std::path::Path;

use anyhow::Result;
use chimera_core::language::detect_language;

pub fn run(input: Option<&Path>) -> Result<()> {
    let code = super::utils::read_input(input)?;
    println!("{}", detect_language(&code));
    Ok(())
}
