//! Markdown export: write generated material to disk.

use std::path::Path;

use tracing::info;

use coursesmith_shared::{CoursesmithError, Result};

/// Write `content` verbatim to `path` (UTF-8, overwriting any existing file).
///
/// Parent directories are created as needed. Callers must only invoke this
/// after generation succeeded, so a failed run never leaves an output file.
pub fn export_markdown(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| CoursesmithError::io(parent, e))?;
        }
    }

    std::fs::write(path, content).map_err(|e| CoursesmithError::io(path, e))?;

    info!(path = %path.display(), bytes = content.len(), "material written");
    Ok(())
}
