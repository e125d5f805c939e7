//! Disk side of a transfer: bytes stream into `<target>.part`, which is
//! fsynced and atomically renamed onto the target only after verification.
//! Readers of the target therefore never observe a half-written file.

mod writer;

pub use writer::PartFile;

use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
