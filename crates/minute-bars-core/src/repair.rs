use std::path::Path;

use tracing::debug;

use crate::error::ExportError;

/// Whether `line` looks like the spurious second header some tabular
/// exporters emit for multi-level column indexes (e.g. `,AAPL,AAPL`).
///
/// The symbol test is a plain substring match, so a ticker that occurs in an
/// ordinary row (`T` inside `2025-11-24T09:30:00`) flags that row too.
pub fn is_header_artifact(line: &str, symbol: &str) -> bool {
    line.starts_with(',') || (!symbol.is_empty() && line.contains(symbol))
}

/// Remove a header artifact directly below the header of the CSV at `path`.
///
/// Returns `true` if the file was rewritten. Files with fewer than two lines,
/// or whose second line is a regular row, are left untouched.
pub fn repair_header_artifact(path: &Path, symbol: &str) -> Result<bool, ExportError> {
    let content = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    if lines.len() < 2 || !is_header_artifact(lines[1], symbol) {
        return Ok(false);
    }

    debug!(
        "dropping header artifact {:?} from {}",
        lines[1].trim_end(),
        path.display()
    );

    let mut repaired = String::with_capacity(content.len() - lines[1].len());
    repaired.push_str(lines[0]);
    for line in &lines[2..] {
        repaired.push_str(line);
    }
    std::fs::write(path, repaired)?;

    Ok(true)
}
