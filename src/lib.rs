//! gatecrawl: concurrent archival crawler for password-protected sites
//!
//! Starting from one URL, gatecrawl renders every same-domain page in a
//! shared Chromium session, submits the configured site password at auth
//! walls, and harvests each page's text plus every linked or intercepted
//! PDF (binary and extracted text) into a timestamped output tree.
//!
//! The crawl is a batch process: [`crawl`] returns once the link graph is
//! exhausted and the PDF pipeline has drained.

pub mod browser_setup;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{CrawlConfig, CrawlConfigBuilder};
pub use content_saver::RunDirs;
pub use crawl_engine::{
    CrawlError, CrawlMetrics, CrawlResult, CrawlSummary, Frontier, MetricsSnapshot, PageOutcome,
    PdfJob, PdfQueue,
};
pub use utils::{sanitize_url_filename, url_utils::normalize_url};

/// Run one crawl to completion and return its summary.
pub async fn crawl(config: CrawlConfig) -> CrawlResult<CrawlSummary> {
    crawl_engine::run_crawl(config).await
}
