//! Atomic file writes for store records
//!
//! Every persisted record (config, template, SQL artifact) must be fully
//! written or not written at all, so store writes go through a temp file in
//! the target directory followed by a rename.

use std::io::Write;
use std::path::Path;

/// Write `contents` to `path` atomically, creating parent directories as
/// needed. On any failure the destination is left untouched.
pub fn atomic_write(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path has no parent directory: {}", path.display()),
        )
    })?;

    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
