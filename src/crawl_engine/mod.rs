//! Crawl Engine Module
//!
//! The core crawl-and-extract machinery: the shared frontier, the page
//! worker pool and per-page processor, the PDF interception pipeline, and
//! the process-wide metrics they all report into.

// Sub-modules
pub mod crawl_types;
pub mod frontier;
pub mod link_extractor;
pub mod metrics;
pub mod page_processor;
pub mod pdf_pipeline;
pub mod scheduler;

// Re-exports for public API
pub use crawl_types::{CrawlError, CrawlResult, PageOutcome, PdfJob};
pub use frontier::Frontier;
pub use link_extractor::extract_links;
pub use metrics::{CrawlMetrics, MetricsSnapshot};
pub use page_processor::{PageContext, is_access_denied, process_page};
pub use pdf_pipeline::{PdfContext, PdfQueue, attach_pdf_interceptor, spawn_pdf_workers};
pub use scheduler::{CrawlSummary, run_crawl};
