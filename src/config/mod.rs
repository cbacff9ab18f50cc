//! Crawl configuration
//!
//! Configuration is supplied before crawl start and immutable during the
//! run. Construction goes through the typestate builder.

mod builder;
mod getters;
mod types;

pub use builder::{CrawlConfigBuilder, WithOutputRoot, WithStartUrl};
pub use types::CrawlConfig;
