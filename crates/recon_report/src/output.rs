//! Artifact path resolution and atomic file writes.

use recon_core::{ReconError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Resolves an artifact path against the current working directory.
///
/// See [`resolve_output_path_in`].
pub fn resolve_output_path(path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| ReconError::io(".", e))?;
    resolve_output_path_in(&cwd, output_dir, path)
}

/// Resolves an artifact path and creates its parent directory.
///
/// Relative paths land under `<base>/<output_dir>/`; absolute paths are used
/// unchanged. Creating a directory that already exists is not an error.
///
/// # Example
///
/// ```rust
/// use recon_report::resolve_output_path_in;
///
/// let base = std::env::temp_dir().join("recon-doc-example");
/// let path = resolve_output_path_in(&base, "output", "diffs.xlsx").unwrap();
/// assert_eq!(path, base.join("output").join("diffs.xlsx"));
/// assert!(path.parent().unwrap().is_dir());
/// ```
pub fn resolve_output_path_in(
    base: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    path: impl AsRef<Path>,
) -> Result<PathBuf> {
    let path = path.as_ref();
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.as_ref().join(output_dir).join(path)
    };

    ensure_parent(&resolved)?;
    Ok(resolved)
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so the destination never holds a partial document.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = ensure_parent(path)?;

    let mut file = NamedTempFile::new_in(&dir).map_err(|e| ReconError::io(&dir, e))?;
    file.write_all(contents)
        .map_err(|e| ReconError::io(file.path(), e))?;
    file.persist(path).map_err(|e| ReconError::io(path, e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "artifact persisted");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| ReconError::io(&parent, e))?;
    Ok(parent)
}
