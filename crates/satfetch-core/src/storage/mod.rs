//! Disk I/O and file lifecycle for tiles.
//!
//! Tiles are written to a per-process temp file next to the final path,
//! synced, then atomically renamed into place. A killed run can leave a
//! stale `.part` file behind but never a truncated tile at a cache path.

mod writer;

pub use writer::StorageWriter;

use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: `<final>.<pid>.part` (e.g. `3.z16.png` → `3.z16.png.4242.part`).
///
/// The pid keeps two runs sharing an output directory from writing the same temp file.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(format!(".{}{}", std::process::id(), TEMP_SUFFIX));
    PathBuf::from(o)
}

/// Writes `data` to `final_path` via temp file + rename. Returns bytes written.
///
/// On failure the temp file is removed and `final_path` is left untouched.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> io::Result<u64> {
    let mut writer = StorageWriter::create(&temp_path(final_path))?;
    writer.write_all(data)?;
    writer.sync()?;
    writer.finalize(final_path)?;
    Ok(data.len() as u64)
}

/// Creates the output directory (and parents). Called once at startup.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}
