//! Process-wide crawl counters
//!
//! One `CrawlMetrics` instance is created at crawl start, shared by `Arc`
//! with every worker and the logger, and discarded when the crawl
//! returns. Counters are atomics so concurrent increments never lose
//! updates; none are reset mid-crawl.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// The five crawl counters.
///
/// `pages_queued` is a gauge (current frontier depth); the rest are
/// monotonic non-decreasing.
#[derive(Debug, Default)]
pub struct CrawlMetrics {
    pages_queued: AtomicUsize,
    pages_done: AtomicU64,
    pdfs_downloaded: AtomicU64,
    retries: AtomicU64,
    failures: AtomicU64,
}

impl CrawlMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the current frontier depth.
    pub fn set_pages_queued(&self, queued: usize) {
        self.pages_queued.store(queued, Ordering::Relaxed);
    }

    /// A page's text artifact was persisted.
    pub fn incr_pages_done(&self) {
        self.pages_done.fetch_add(1, Ordering::Relaxed);
    }

    /// A PDF binary and its extracted text were both persisted.
    pub fn incr_pdfs_downloaded(&self) {
        self.pdfs_downloaded.fetch_add(1, Ordering::Relaxed);
    }

    /// An access-denied requeue or a PDF re-fetch was scheduled.
    pub fn incr_retries(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    /// A navigation, tab click, or PDF job failed permanently.
    pub fn incr_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough point-in-time copy for logging and assertions.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_queued: self.pages_queued.load(Ordering::Relaxed),
            pages_done: self.pages_done.load(Ordering::Relaxed),
            pdfs_downloaded: self.pdfs_downloaded.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CrawlMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub pages_queued: usize,
    pub pages_done: u64,
    pub pdfs_downloaded: u64,
    pub retries: u64,
    pub failures: u64,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "queued={}, done_pages={}, done_pdfs={}, retries={}, failures={}",
            self.pages_queued, self.pages_done, self.pdfs_downloaded, self.retries, self.failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counters_accumulate() {
        let metrics = CrawlMetrics::new();
        metrics.incr_pages_done();
        metrics.incr_pages_done();
        metrics.incr_retries();
        metrics.set_pages_queued(7);

        let snap = metrics.snapshot();
        assert_eq!(snap.pages_done, 2);
        assert_eq!(snap.retries, 1);
        assert_eq!(snap.pages_queued, 7);
        assert_eq!(snap.failures, 0);
    }

    #[test]
    fn test_gauge_overwrites() {
        let metrics = CrawlMetrics::new();
        metrics.set_pages_queued(10);
        metrics.set_pages_queued(3);
        assert_eq!(metrics.snapshot().pages_queued, 3);
    }

    #[tokio::test]
    async fn test_concurrent_increments_never_lose_updates() {
        let metrics = Arc::new(CrawlMetrics::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let metrics = Arc::clone(&metrics);
            handles.push(tokio::spawn(async move {
                for _ in 0..1000 {
                    metrics.incr_pdfs_downloaded();
                }
            }));
        }
        for handle in handles {
            handle.await.expect("task panicked");
        }
        assert_eq!(metrics.snapshot().pdfs_downloaded, 8000);
    }

    #[test]
    fn test_snapshot_display_format() {
        let metrics = CrawlMetrics::new();
        metrics.incr_failures();
        assert_eq!(
            metrics.snapshot().to_string(),
            "queued=0, done_pages=0, done_pdfs=0, retries=0, failures=1"
        );
    }
}
