use crate::prelude::{eprintln, *};
use std::fs;
use std::io::Read;
use std::path::Path;

use tally_core::error::parse_document;

/// Human-readable name of an input source
pub fn source_name(path: Option<&Path>) -> String {
    match path {
        Some(p) if p != Path::new("-") => p.display().to_string(),
        _ => "stdin".to_string(),
    }
}

/// Read the raw input document from a file, or from stdin when the path is
/// absent or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let raw = match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file {}", p.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            buffer
        }
    };

    if raw.trim().is_empty() {
        return Err(Error::EmptyInput(source_name(path)).into());
    }

    Ok(raw)
}

/// Read and parse the input document
///
/// Malformed JSON is reported as a pipeline failure, like any other
/// malformed container.
pub fn load_document(path: Option<&Path>, verbose: bool) -> Result<serde_json::Value> {
    if verbose {
        eprintln!("Reading input from {}", source_name(path));
    }

    let raw = read_input(path)?;
    Ok(parse_document(&raw).map_err(Error::from)?)
}
