//! Link discovery from rendered HTML
//!
//! This module parses a page's rendered HTML for anchors, resolves them
//! against the page URL, and filters them down to fetchable same-domain
//! candidates.

use log::{debug, warn};
use scraper::{Html, Selector};
use url::Url;

use crate::utils::url_utils::is_valid_url;

/// Extract crawl candidates from rendered HTML.
///
/// Every `a[href]` is resolved against `page_url`, fragment-stripped, and
/// kept only when it is a fetchable http(s) URL whose authority matches
/// `start_url`. Deduplication against already-seen URLs is the frontier's
/// job, not this function's.
#[must_use]
pub fn extract_links(html: &str, page_url: &str, start_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        warn!("Cannot resolve links: invalid page URL {page_url}");
        return Vec::new();
    };
    let start_host = match Url::parse(start_url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        Some(host) => host,
        None => {
            warn!("Cannot resolve links: start URL {start_url} has no host");
            return Vec::new();
        }
    };

    let anchor = match Selector::parse("a[href]") {
        Ok(sel) => sel,
        Err(e) => {
            warn!("Anchor selector failed to parse: {e}");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for element in document.select(&anchor) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base.join(href) else {
            debug!("Skipping unresolvable href '{href}' on {page_url}");
            continue;
        };
        resolved.set_fragment(None);

        let url = resolved.to_string();
        if !is_valid_url(&url) {
            continue;
        }
        if resolved.host_str() != Some(start_host.as_str()) {
            debug!("Skipping external-domain link: {url}");
            continue;
        }
        links.push(url);
    }
    links
}
