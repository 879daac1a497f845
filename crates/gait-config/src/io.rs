//! Reading and writing config files.
//!
//! Files are read in full before parsing starts and written atomically, so
//! a failed parse or an interrupted write never leaves half a config behind.

use crate::error::{Error, Result};
use crate::tree::ConfigTree;
use crate::update::{UpdateReport, update_with_report};
use crate::writer::dump;
use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write content atomically to a file with locking.
///
/// The content goes to a hidden temp file next to the target, written under
/// an exclusive lock, which is then persisted over the target. The temp file
/// is removed on every failure path.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::io(dir, e))?;

    let locked = |e: std::io::Error| {
        tracing::debug!(?path, error = %e, "Config file lock failed");
        Error::LockFailed {
            path: path.to_path_buf(),
        }
    };
    temp.as_file().lock_exclusive().map_err(locked)?;
    temp.write_all(content)
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file().unlock().map_err(locked)?;

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// Parse a config file.
pub fn load(path: &Path) -> Result<ConfigTree> {
    let text = read_text(path)?;
    tracing::debug!(?path, "Loading config");
    ConfigTree::parse(&text)
}

/// Write a tree to a file in canonical form.
pub fn save(tree: &ConfigTree, path: &Path) -> Result<()> {
    tracing::debug!(?path, sections = tree.len(), "Saving config");
    write_atomic(path, dump(tree).as_bytes())
}

/// Update existing values in `tree` from a config file.
pub fn update_from_file(tree: &mut ConfigTree, path: &Path) -> Result<UpdateReport> {
    let text = read_text(path)?;
    tracing::debug!(?path, "Updating config from file");
    update_with_report(tree, &text)
}
