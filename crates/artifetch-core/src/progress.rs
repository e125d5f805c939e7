//! Progress reporting: short status notices and byte-level transfer stats.
//!
//! The sink is an explicit handle owned by the caller and passed to the
//! fetcher and transport. Reporting is observational only; it never affects
//! control flow.

/// Snapshot of one transfer's progress (CLI-friendly).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferStats {
    /// Bytes received so far.
    pub bytes_done: u64,
    /// Total size in bytes, when the server announced it.
    pub total_bytes: Option<u64>,
    /// Elapsed time since the transfer started (seconds).
    pub elapsed_secs: f64,
}

impl TransferStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if size or rate is unknown).
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total_bytes?;
        let remaining = total.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0], None if the size is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match self.total_bytes {
            None => None,
            Some(0) => Some(1.0),
            Some(total) => Some((self.bytes_done as f64 / total as f64).min(1.0)),
        }
    }
}

/// Receives human-readable notices ("Retrieving ...", "Trying <url>") and
/// transfer progress.
pub trait ProgressSink: Send + Sync {
    fn say(&self, message: &str);

    /// Called repeatedly while bytes flow. Default: ignored.
    fn transfer(&self, _url: &str, _stats: &TransferStats) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn say(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_eta_fraction() {
        let s = TransferStats {
            bytes_done: 50,
            total_bytes: Some(200),
            elapsed_secs: 5.0,
        };
        assert!((s.bytes_per_sec() - 10.0).abs() < 1e-9);
        assert!((s.eta_secs().unwrap() - 15.0).abs() < 1e-9);
        assert!((s.fraction().unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn unknown_total() {
        let s = TransferStats {
            bytes_done: 10,
            total_bytes: None,
            elapsed_secs: 1.0,
        };
        assert_eq!(s.eta_secs(), None);
        assert_eq!(s.fraction(), None);
    }

    #[test]
    fn zero_elapsed_and_empty_file() {
        let s = TransferStats {
            bytes_done: 0,
            total_bytes: Some(0),
            elapsed_secs: 0.0,
        };
        assert_eq!(s.bytes_per_sec(), 0.0);
        assert_eq!(s.eta_secs(), Some(0.0));
        assert_eq!(s.fraction(), Some(1.0));
    }
}
