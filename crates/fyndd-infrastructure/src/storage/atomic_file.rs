//! Atomic file writes and inter-process locking.
//!
//! Writes go to a hidden sibling tmp file, are fsynced, then renamed over the
//! target, so readers only ever see the old or the new content.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use fyndd_core::FynddError;

/// Errors that can occur during atomic file operations.
#[derive(Debug)]
pub enum AtomicFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON encoding or decoding error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicFileError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicFileError::JsonError(e) => write!(f, "JSON error: {}", e),
            AtomicFileError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicFileError {}

impl From<std::io::Error> for AtomicFileError {
    fn from(e: std::io::Error) -> Self {
        AtomicFileError::IoError(e)
    }
}

impl From<serde_json::Error> for AtomicFileError {
    fn from(e: serde_json::Error) -> Self {
        AtomicFileError::JsonError(e)
    }
}

impl From<AtomicFileError> for FynddError {
    fn from(e: AtomicFileError) -> Self {
        FynddError::storage(e.to_string())
    }
}

/// Reads a file, treating a missing or blank file as `None`.
pub fn read_if_present(path: &Path) -> Result<Option<String>, AtomicFileError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}

/// Replaces the file content atomically (tmp file + fsync + rename).
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), AtomicFileError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path)?;
    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(content)?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, AtomicFileError> {
    let file_name = path.file_name().ok_or_else(|| {
        AtomicFileError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no file name",
        ))
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

/// Exclusive lock guard; the lock is released when dropped.
///
/// The `.lock` file itself is left in place. Unlinking it while held would let
/// a waiter lock the orphaned inode while another process locks a fresh file.
pub struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    /// Blocks until an exclusive lock next to `path` is held.
    pub fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| AtomicFileError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("state.json");

        write_atomic(&path, b"{\"a\":\"1\"}").unwrap();

        assert_eq!(read_if_present(&path).unwrap().unwrap(), "{\"a\":\"1\"}");
        assert!(!temp_dir.path().join("nested").join(".state.json.tmp").exists());
    }

    #[test]
    fn test_missing_and_blank_files_read_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        assert!(read_if_present(&path).unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(read_if_present(&path).unwrap().is_none());
    }

    #[test]
    fn test_lock_is_exclusive_and_file_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        let lock_path = temp_dir.path().join("state.lock");

        let lock = FileLock::acquire(&path).unwrap();
        let other = OpenOptions::new().write(true).open(&lock_path).unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(lock);
        assert!(lock_path.exists());
        other.try_lock_exclusive().unwrap();
        other.unlock().unwrap();

        let _again = FileLock::acquire(&path).unwrap();
    }
}
