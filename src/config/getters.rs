//! Accessor methods for `CrawlConfig`
//!
//! Fields are `pub(crate)`; external callers read configuration through
//! these getters.

use std::path::Path;
use std::time::Duration;

use super::types::CrawlConfig;

impl CrawlConfig {
    /// Root directory under which run directories are created.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// The URL the crawl starts from.
    #[must_use]
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// The shared site password, if configured.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// URLs and prefixes that are never fetched.
    #[must_use]
    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    /// Number of concurrent page workers.
    #[must_use]
    pub fn page_workers(&self) -> usize {
        self.page_workers
    }

    /// Number of PDF pipeline workers.
    #[must_use]
    pub fn pdf_workers(&self) -> usize {
        self.pdf_workers
    }

    /// Whether the browser runs headless.
    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    /// CSS selector marking a completed login.
    #[must_use]
    pub fn auth_container_selector(&self) -> &str {
        &self.auth_container_selector
    }

    /// Bounded timeout for `page.goto()` plus the load event.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Bounded wait for the password field to detach after submit.
    #[must_use]
    pub fn auth_detach_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_detach_timeout_secs)
    }

    /// Bounded wait for the content container to become visible.
    #[must_use]
    pub fn auth_container_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_container_timeout_secs)
    }

    /// Bounded wait for the page to settle after authentication.
    #[must_use]
    pub fn auth_settle_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_settle_timeout_secs)
    }
}
