//! Progress sink that writes notices and a throttled transfer line to stderr.

use artifetch_core::progress::{ProgressSink, TransferStats};
use std::io::Write;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Default)]
pub struct StderrSink {
    last_print: Mutex<Option<Instant>>,
}

impl StderrSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for StderrSink {
    fn say(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn transfer(&self, _url: &str, stats: &TransferStats) {
        let now = Instant::now();
        let finished = stats.fraction().is_some_and(|f| f >= 1.0);
        let Ok(mut last) = self.last_print.lock() else {
            return;
        };
        if let Some(prev) = *last {
            if now.duration_since(prev) < PROGRESS_INTERVAL && !finished {
                return;
            }
        }
        *last = Some(now);
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\r{}", format_stats(stats));
        if finished {
            let _ = writeln!(err);
        }
    }
}

pub(crate) fn format_stats(stats: &TransferStats) -> String {
    const MIB: f64 = 1_048_576.0;
    let done_mib = stats.bytes_done as f64 / MIB;
    let rate_mib = stats.bytes_per_sec() / MIB;
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    match (stats.total_bytes, stats.fraction()) {
        (Some(total), Some(fraction)) => format!(
            "  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}  ",
            done_mib,
            total as f64 / MIB,
            fraction * 100.0,
            rate_mib,
            eta
        ),
        _ => format!("  {:.1} MiB  {:.2} MiB/s  ", done_mib, rate_mib),
    }
}
