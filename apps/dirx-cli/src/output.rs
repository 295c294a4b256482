//! Local file output.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{CliError, CliResult};

/// Write content to a file, creating or truncating it.
pub fn write_file(path: &Path, content: &str) -> CliResult<()> {
    let mut file = fs::File::create(path)
        .map_err(|e| CliError::Io(format!("Failed to create file {}: {}", path.display(), e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| CliError::Io(format!("Failed to write to file {}: {}", path.display(), e)))?;

    Ok(())
}
