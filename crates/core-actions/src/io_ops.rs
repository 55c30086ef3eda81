//! File IO wrappers used by the `:o`, `:s`, `:sa` and `:sq` commands.
//!
//! These add user-facing context to the typed document errors so the
//! dispatcher can surface `{:#}` directly as the status message.

use anyhow::{Context, Result};
use core_text::Document;
use std::path::{Path, PathBuf};

/// Load `path` into `doc`. On failure `doc` is left as it was.
pub fn open_file(doc: &mut Document, path: &Path, max_file_size: u64) -> Result<()> {
    doc.load(path, max_file_size)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;
    tracing::info!(target: "runtime.command", path = %path.display(), lines = doc.line_count(), "open_ok");
    Ok(())
}

/// Save `doc` to `target`, or to its bound filename when `target` is `None`.
/// Returns the path written.
pub fn write_file(doc: &mut Document, target: Option<&Path>) -> Result<PathBuf> {
    let written = doc.save(target).context("Failed to save")?;
    tracing::info!(target: "runtime.command", path = %written.display(), "write_ok");
    Ok(written)
}
