//! Sequential writer for a tile temp file.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Owns a temp file until `finalize` renames it into place.
/// Dropping an unfinalized writer removes the temp file.
pub struct StorageWriter {
    file: Option<File>,
    temp_path: PathBuf,
}

impl StorageWriter {
    /// Create a new temp file at `temp_path`. Overwrites a stale temp file at the same path.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(Self {
            file: Some(file),
            temp_path: temp_path.to_path_buf(),
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.write_all(data),
            None => Err(io::Error::new(io::ErrorKind::Other, "writer already finalized")),
        }
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> io::Result<()> {
        match self.file.as_ref() {
            Some(f) => f.sync_all(),
            None => Ok(()),
        }
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically rename the temp file to the final path. Consumes the writer and closes the file.
    pub fn finalize(mut self, final_path: &Path) -> io::Result<()> {
        drop(self.file.take());
        std::fs::rename(&self.temp_path, final_path)?;
        // Renamed away; nothing left for Drop to clean up.
        self.temp_path = PathBuf::new();
        Ok(())
    }
}

impl Drop for StorageWriter {
    fn drop(&mut self) {
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        drop(self.file.take());
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            tracing::debug!(path = %self.temp_path.display(), "could not remove temp file: {}", e);
        }
    }
}
