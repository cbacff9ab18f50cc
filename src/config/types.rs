//! Core configuration types for a crawl run
//!
//! This module contains the main `CrawlConfig` struct and its associated
//! types that define the configuration parameters for one crawl of a
//! password-protected site.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct for a single crawl run.
///
/// All fields are fixed before the crawl starts and immutable during it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Root directory under which each run creates its timestamped tree.
    ///
    /// **INVARIANT:** set through the builder; the per-run directory is
    /// derived from it at crawl start, never stored here.
    pub(crate) output_root: PathBuf,

    /// Absolute URL the crawl starts from. Its authority defines the
    /// same-domain scope for every discovered link.
    pub(crate) start_url: String,

    /// Shared site password typed into any auth wall encountered.
    /// `None` means auth walls are submitted with an empty credential.
    pub(crate) password: Option<String>,

    /// URLs and URL prefixes that are never claimed or fetched.
    pub(crate) blacklist: Vec<String>,

    /// Number of concurrent page workers (default 5).
    pub(crate) page_workers: usize,

    /// Number of PDF pipeline workers (default 3).
    pub(crate) pdf_workers: usize,

    /// Run the browser headless. Headed mode is a debugging aid.
    pub(crate) headless: bool,

    /// CSS selector for the container that signals a completed login.
    pub(crate) auth_container_selector: String,

    /// Timeout in seconds for navigation (`goto` + load event).
    ///
    /// Exceeding it abandons the page: no artifact, failure counted.
    pub(crate) navigation_timeout_secs: u64,

    /// Timeout in seconds for the password field to detach after submit.
    pub(crate) auth_detach_timeout_secs: u64,

    /// Timeout in seconds for the content container to become visible.
    pub(crate) auth_container_timeout_secs: u64,

    /// Timeout in seconds for the page to settle after authentication.
    ///
    /// All three auth timeouts are non-fatal: on expiry the processor
    /// continues with whatever content is available.
    pub(crate) auth_settle_timeout_secs: u64,

    /// Chrome user data directory for browser profile isolation.
    /// When unset, a per-process temp directory is used.
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        use crate::utils::constants::{
            DEFAULT_AUTH_CONTAINER_SELECTOR, DEFAULT_AUTH_CONTAINER_TIMEOUT_SECS,
            DEFAULT_AUTH_DETACH_TIMEOUT_SECS, DEFAULT_AUTH_SETTLE_TIMEOUT_SECS,
            DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_PAGE_WORKERS, DEFAULT_PDF_WORKERS,
        };

        Self {
            output_root: PathBuf::from("./results"),
            start_url: String::new(),
            password: None,
            blacklist: Vec::new(),
            page_workers: DEFAULT_PAGE_WORKERS,
            pdf_workers: DEFAULT_PDF_WORKERS,
            headless: true,
            auth_container_selector: DEFAULT_AUTH_CONTAINER_SELECTOR.to_string(),
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            auth_detach_timeout_secs: DEFAULT_AUTH_DETACH_TIMEOUT_SECS,
            auth_container_timeout_secs: DEFAULT_AUTH_CONTAINER_TIMEOUT_SECS,
            auth_settle_timeout_secs: DEFAULT_AUTH_SETTLE_TIMEOUT_SECS,
            chrome_data_dir: None,
        }
    }
}

impl CrawlConfig {
    /// Set Chrome user data directory for browser profile isolation.
    ///
    /// When set, the browser uses this specific directory for its user
    /// data, preventing profile lock contention when several crawls run
    /// from the same machine.
    #[must_use]
    pub fn with_chrome_data_dir(mut self, dir: PathBuf) -> Self {
        self.chrome_data_dir = Some(dir);
        self
    }

    /// Get the Chrome user data directory if configured.
    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
