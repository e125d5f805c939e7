//! Sequential writer for a `.part` download file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered writer for a temp download file. Not shared: one transfer owns it.
pub struct PartFile {
    file: BufWriter<File>,
    temp_path: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create a new temp file at `temp_path` (e.g. `destination.part`).
    /// Truncates any leftover from an interrupted run.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(PartFile {
            file: BufWriter::with_capacity(64 * 1024, file),
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flush buffers and sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.get_ref().sync_all()
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically rename the temp file to the final path, replacing it. Consumes
    /// the writer and closes the file. Fails if `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let PartFile {
            file, temp_path, ..
        } = self;
        let file = file.into_inner().map_err(|e| e.into_error())?;
        drop(file);
        std::fs::rename(&temp_path, final_path)
    }

    /// Close and delete the temp file. Removal errors are only logged.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %temp_path.display(), "failed to remove temp file: {}", e);
            }
        }
    }
}
