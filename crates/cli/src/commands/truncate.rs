//! `promptpack truncate`: Cut text to a character budget at a word boundary.

use std::io::Read;
use std::path::Path;

use promptpack_engine::truncate_at_boundary;

pub fn run(budget: usize, input: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = truncate_at_boundary(&text, budget);
    if result.truncated {
        tracing::info!(budget, "input truncated");
    }
    print!("{}", result.text);
    Ok(())
}
