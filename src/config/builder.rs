//! Type-safe builder for `CrawlConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time
//! validation ensuring that required fields are set before building a
//! `CrawlConfig`.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::CrawlConfig;

// Type states for the builder
pub struct WithOutputRoot;
pub struct WithStartUrl;

pub struct CrawlConfigBuilder<State = ()> {
    pub(crate) output_root: Option<PathBuf>,
    pub(crate) start_url: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) blacklist: Vec<String>,
    pub(crate) page_workers: usize,
    pub(crate) pdf_workers: usize,
    pub(crate) headless: bool,
    pub(crate) auth_container_selector: String,
    pub(crate) navigation_timeout_secs: u64,
    pub(crate) auth_detach_timeout_secs: u64,
    pub(crate) auth_container_timeout_secs: u64,
    pub(crate) auth_settle_timeout_secs: u64,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for CrawlConfigBuilder<()> {
    fn default() -> Self {
        let defaults = CrawlConfig::default();
        Self {
            output_root: None,
            start_url: None,
            password: None,
            blacklist: Vec::new(),
            page_workers: defaults.page_workers,
            pdf_workers: defaults.pdf_workers,
            headless: defaults.headless,
            auth_container_selector: defaults.auth_container_selector,
            navigation_timeout_secs: defaults.navigation_timeout_secs,
            auth_detach_timeout_secs: defaults.auth_detach_timeout_secs,
            auth_container_timeout_secs: defaults.auth_container_timeout_secs,
            auth_settle_timeout_secs: defaults.auth_settle_timeout_secs,
            _phantom: PhantomData,
        }
    }
}

impl CrawlConfig {
    /// Create a builder for configuring a `CrawlConfig` with a fluent
    /// interface.
    #[must_use]
    pub fn builder() -> CrawlConfigBuilder<()> {
        CrawlConfigBuilder::default()
    }
}

impl<State> CrawlConfigBuilder<State> {
    fn transition<Next>(self) -> CrawlConfigBuilder<Next> {
        CrawlConfigBuilder {
            output_root: self.output_root,
            start_url: self.start_url,
            password: self.password,
            blacklist: self.blacklist,
            page_workers: self.page_workers,
            pdf_workers: self.pdf_workers,
            headless: self.headless,
            auth_container_selector: self.auth_container_selector,
            navigation_timeout_secs: self.navigation_timeout_secs,
            auth_detach_timeout_secs: self.auth_detach_timeout_secs,
            auth_container_timeout_secs: self.auth_container_timeout_secs,
            auth_settle_timeout_secs: self.auth_settle_timeout_secs,
            _phantom: PhantomData,
        }
    }

    /// Set the shared site password typed into auth walls.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the blacklist of URLs and URL prefixes to never fetch.
    #[must_use]
    pub fn blacklist(mut self, blacklist: Vec<String>) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Set the number of concurrent page workers.
    #[must_use]
    pub fn page_workers(mut self, workers: usize) -> Self {
        self.page_workers = workers;
        self
    }

    /// Set the number of PDF pipeline workers.
    #[must_use]
    pub fn pdf_workers(mut self, workers: usize) -> Self {
        self.pdf_workers = workers;
        self
    }

    /// Set whether the browser runs headless.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Override the CSS selector that marks a completed login.
    #[must_use]
    pub fn auth_container_selector(mut self, selector: impl Into<String>) -> Self {
        self.auth_container_selector = selector.into();
        self
    }

    /// Override the navigation timeout in seconds.
    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.navigation_timeout_secs = secs;
        self
    }
}

impl CrawlConfigBuilder<()> {
    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> CrawlConfigBuilder<WithOutputRoot> {
        self.output_root = Some(dir.into());
        self.transition()
    }
}

impl CrawlConfigBuilder<WithOutputRoot> {
    pub fn start_url(mut self, url: impl Into<String>) -> CrawlConfigBuilder<WithStartUrl> {
        let url_string = url.into();

        // Normalize URL: add https:// if no scheme is present
        let normalized_url =
            if url_string.starts_with("http://") || url_string.starts_with("https://") {
                url_string
            } else {
                format!("https://{url_string}")
            };

        self.start_url = Some(normalized_url);
        self.transition()
    }
}

// Build method only available when all required fields are set
impl CrawlConfigBuilder<WithStartUrl> {
    pub fn build(self) -> Result<CrawlConfig> {
        let start_url = self
            .start_url
            .ok_or_else(|| anyhow!("start_url is required"))?;

        // The start URL's authority defines the crawl scope; reject URLs
        // that have no host before any worker ever runs.
        let parsed = Url::parse(&start_url)
            .map_err(|e| anyhow!("Invalid start URL '{start_url}': {e}"))?;
        if parsed.host_str().is_none() {
            return Err(anyhow!("Start URL '{start_url}' has no host"));
        }

        if self.page_workers == 0 || self.pdf_workers == 0 {
            return Err(anyhow!("Worker counts must be at least 1"));
        }

        Ok(CrawlConfig {
            output_root: self
                .output_root
                .ok_or_else(|| anyhow!("output_root is required"))?,
            start_url,
            password: self.password,
            blacklist: self.blacklist,
            page_workers: self.page_workers,
            pdf_workers: self.pdf_workers,
            headless: self.headless,
            auth_container_selector: self.auth_container_selector,
            navigation_timeout_secs: self.navigation_timeout_secs,
            auth_detach_timeout_secs: self.auth_detach_timeout_secs,
            auth_container_timeout_secs: self.auth_container_timeout_secs,
            auth_settle_timeout_secs: self.auth_settle_timeout_secs,
            chrome_data_dir: None,
        })
    }
}
