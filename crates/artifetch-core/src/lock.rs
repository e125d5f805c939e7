//! Cross-process advisory locking on a sidecar `<target>.lock` file.
//!
//! Uses `flock`-style locks through `fd-lock`, so independent processes (and
//! threads holding their own file handles) exclude each other. The lock is
//! released when the guard drops, on every exit path including unwinding.

use fd_lock::RwLock;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of the sidecar lock file.
pub const LOCK_SUFFIX: &str = ".lock";

/// Could not create or lock the lock file. Points at an environment or
/// permissions problem rather than a network one.
#[derive(Debug, thiserror::Error)]
#[error("failed to lock {}", path.display())]
pub struct LockError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Path of the lock file for `target`: appends `.lock` (e.g. `a.iso` → `a.iso.lock`).
pub fn lock_path(target: &Path) -> PathBuf {
    let mut o = target.as_os_str().to_owned();
    o.push(LOCK_SUFFIX);
    PathBuf::from(o)
}

/// Runs `f` while holding an exclusive lock on `lock_file`.
///
/// Blocks until the lock is available; there is no timeout. Parent
/// directories are created. The lock file itself is left in place.
pub fn with_exclusive_lock<T, F>(lock_file: &Path, f: F) -> Result<T, LockError>
where
    F: FnOnce() -> T,
{
    let err = |source| LockError {
        path: lock_file.to_path_buf(),
        source,
    };
    if let Some(parent) = lock_file.parent() {
        fs::create_dir_all(parent).map_err(err)?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_file)
        .map_err(err)?;

    let mut lock = RwLock::new(file);
    tracing::debug!(lock = %lock_file.display(), "acquiring lock");
    let _guard = lock.write().map_err(err)?;
    tracing::debug!(lock = %lock_file.display(), "lock acquired");
    Ok(f())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn lock_path_appends_suffix() {
        assert_eq!(lock_path(Path::new("a.iso")), PathBuf::from("a.iso.lock"));
        assert_eq!(
            lock_path(Path::new("/cache/abc.iso")),
            PathBuf::from("/cache/abc.iso.lock")
        );
    }

    #[test]
    fn creates_parent_dirs_and_returns_value() {
        let dir = tempfile::tempdir().unwrap();
        let lf = dir.path().join("nested/deeper/x.iso.lock");
        let v = with_exclusive_lock(&lf, || 42).unwrap();
        assert_eq!(v, 42);
        assert!(lf.exists());
    }

    #[test]
    fn holders_never_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let lf = Arc::new(dir.path().join("shared.lock"));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lf = Arc::clone(&lf);
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    with_exclusive_lock(&lf, || {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(30));
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    })
                    .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn released_after_panic() {
        let dir = tempfile::tempdir().unwrap();
        let lf = dir.path().join("p.lock");
        let lf2 = lf.clone();
        let r = thread::spawn(move || {
            with_exclusive_lock(&lf2, || panic!("boom")).unwrap();
        })
        .join();
        assert!(r.is_err());
        assert_eq!(with_exclusive_lock(&lf, || "again").unwrap(), "again");
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let err = with_exclusive_lock(&blocker.join("sub/x.lock"), || ()).unwrap_err();
        assert_eq!(err.path, blocker.join("sub/x.lock"));
    }
}
