//! Progress reporting for direct downloads.
//!
//! Progress is only ever logged; nothing is reported back to the caller.

const MIB: f64 = 1024.0 * 1024.0;

/// Snapshot of a running transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressStats {
    /// Bytes written so far.
    pub bytes_done: u64,
    /// Declared total size, if the server sent `Content-Length`.
    pub total_bytes: Option<u64>,
}

impl ProgressStats {
    pub fn mib_done(&self) -> f64 {
        self.bytes_done as f64 / MIB
    }

    /// Percent complete in [0.0, 100.0]; None when the size is unknown.
    pub fn percent(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) => Some(100.0),
            Some(total) => Some((self.bytes_done as f64 / total as f64 * 100.0).min(100.0)),
            None => None,
        }
    }
}

/// Tracks cumulative bytes and emits a log line each time another `step`
/// bytes have been written. Steps are only reported when the total is known.
#[derive(Debug)]
pub struct ProgressLog {
    stats: ProgressStats,
    step: u64,
    next_mark: u64,
    announced: bool,
}

impl ProgressLog {
    pub fn new(step: u64) -> Self {
        let step = step.max(1);
        Self {
            stats: ProgressStats {
                bytes_done: 0,
                total_bytes: None,
            },
            step,
            next_mark: step,
            announced: false,
        }
    }

    /// Record the declared size. Called per response, so a redirect's
    /// headers are overwritten by the final response's.
    pub fn set_total(&mut self, total: Option<u64>) {
        self.stats.total_bytes = total.filter(|&t| t > 0);
    }

    pub fn stats(&self) -> ProgressStats {
        self.stats
    }

    /// Account for `n` freshly written bytes. Returns true if a progress line was logged.
    pub fn advance(&mut self, n: u64) -> bool {
        if !self.announced {
            self.announce();
        }
        self.stats.bytes_done += n;
        if self.stats.total_bytes.is_none() || self.stats.bytes_done < self.next_mark {
            return false;
        }
        // One line per crossing, even if a chunk jumped several steps.
        self.next_mark = (self.stats.bytes_done / self.step + 1) * self.step;
        tracing::info!(
            "downloaded: {:.2} MB ({:.2}%)",
            self.stats.mib_done(),
            self.stats.percent().unwrap_or(0.0)
        );
        true
    }

    fn announce(&mut self) {
        self.announced = true;
        match self.stats.total_bytes {
            Some(total) => tracing::info!("total file size: {:.2} MB", total as f64 / MIB),
            None => tracing::info!("unknown file size, downloading"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_and_mib() {
        let s = ProgressStats {
            bytes_done: 512 * 1024,
            total_bytes: Some(1024 * 1024),
        };
        assert_eq!(s.percent(), Some(50.0));
        assert!((s.mib_done() - 0.5).abs() < f64::EPSILON);
        let unknown = ProgressStats {
            bytes_done: 10,
            total_bytes: None,
        };
        assert_eq!(unknown.percent(), None);
    }

    #[test]
    fn logs_once_per_step_with_known_total() {
        let mut p = ProgressLog::new(1024);
        p.set_total(Some(4096));
        let mut logged = 0;
        for _ in 0..32 {
            if p.advance(128) {
                logged += 1;
            }
        }
        assert_eq!(logged, 4);
        assert_eq!(p.stats().bytes_done, 4096);
    }

    #[test]
    fn large_chunk_crossing_several_steps_logs_once() {
        let mut p = ProgressLog::new(100);
        p.set_total(Some(1000));
        assert!(p.advance(350));
        assert!(!p.advance(40));
        assert!(p.advance(10));
    }

    #[test]
    fn no_step_logging_without_total() {
        let mut p = ProgressLog::new(10);
        p.set_total(None);
        assert!(!p.advance(100));
        assert!(!p.advance(100));
        assert_eq!(p.stats().bytes_done, 200);
    }

    #[test]
    fn zero_length_is_treated_as_unknown() {
        let mut p = ProgressLog::new(10);
        p.set_total(Some(0));
        assert_eq!(p.stats().total_bytes, None);
    }
}
