//! Core types for crawl operations
//!
//! This module contains the fundamental types used throughout the crawler:
//! the public error type, PDF pipeline jobs, and per-page outcomes.

use thiserror::Error;

/// Error type surfaced at the crate API boundary.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    /// Browser launch or CDP error
    #[error("Browser error: {0}")]
    Browser(String),
    /// Output tree creation or write error
    #[error("Storage error: {0}")]
    Storage(String),
    /// Other errors
    #[error("Crawl error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} preserves the full context chain
        Self::Other(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// A unit of work for the PDF worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfJob {
    /// Fetch, persist and text-extract the PDF at this URL.
    Fetch(String),
    /// Poison pill: the receiving worker exits instead of waiting for
    /// more work.
    Shutdown,
}

/// Terminal state of one page-processing pass.
///
/// `Denied` means the URL went back into the frontier and will be claimed
/// again; the other variants are final for that URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Text artifact written, links and tabs discovered.
    Saved,
    /// A denial sentinel matched; the URL was requeued.
    Denied,
    /// Navigation failed or timed out; the page was abandoned.
    NavFailed,
}
