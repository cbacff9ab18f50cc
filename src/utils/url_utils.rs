//! URL predicates and normalization
//!
//! This module provides functions for working with URLs in the context of
//! same-domain crawling and PDF discovery.

use anyhow::Result;
use url::Url;

/// Normalize a URL string by stripping fragment anchors.
///
/// Fragment identifiers (#foo) are client-side navigation markers that don't
/// represent different HTTP resources. Removing them enables proper URL
/// deduplication during crawling.
///
/// # Arguments
/// * `url` - URL string to normalize
///
/// # Returns
/// * `Ok(String)` - Normalized URL without fragment
/// * `Err` - If URL parsing fails
pub fn normalize_url(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url)
        .map_err(|e| anyhow::anyhow!("Failed to parse URL for normalization: {e}"))?;
    parsed.set_fragment(None);
    Ok(parsed.to_string())
}

/// Check if a URL is a fetchable http(s) resource.
///
/// Skips data URLs, javascript URLs, mailto links and anything else that
/// can't be navigated to.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Check whether two URLs share the same authority (host).
///
/// This is the same-domain scoping rule: a discovered link is eligible only
/// if its host matches the start URL's host exactly. Subdomains do not
/// match.
#[must_use]
pub fn same_authority(url: &str, reference: &str) -> bool {
    let (Ok(a), Ok(b)) = (Url::parse(url), Url::parse(reference)) else {
        return false;
    };
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => ha == hb,
        _ => false,
    }
}

/// Check whether a URL points at a PDF by suffix.
///
/// Suffix-based detection is deliberately conservative: URLs serving PDFs
/// without the extension are still caught later by response interception.
#[must_use]
pub fn has_pdf_suffix(url: &str) -> bool {
    url.to_lowercase().ends_with(".pdf")
}

/// Derive a PDF artifact name from its URL: the last path segment, or
/// `doc.pdf` when the path has none.
#[must_use]
pub fn pdf_name_from_url(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.next_back().map(str::to_string))
        })
        .unwrap_or_default();

    if segment.is_empty() {
        "doc.pdf".to_string()
    } else {
        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page#section").expect("valid url"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_url("not a url").is_err());
    }

    #[test]
    fn test_is_valid_url_filters_schemes() {
        assert!(is_valid_url("https://example.com/x"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url("mailto:a@b.c"));
        assert!(!is_valid_url("data:text/plain;base64,aGk="));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_same_authority_exact_host_only() {
        let start = "https://site.example.com/home";
        assert!(same_authority("https://site.example.com/other", start));
        assert!(!same_authority("https://cdn.example.com/a.pdf", start));
        assert!(!same_authority("https://example.com/", start));
        assert!(!same_authority("not a url", start));
    }

    #[test]
    fn test_pdf_suffix_case_insensitive() {
        assert!(has_pdf_suffix("https://example.com/doc.PDF"));
        assert!(has_pdf_suffix("https://example.com/a/b/report.pdf"));
        assert!(!has_pdf_suffix("https://example.com/doc.pdf?inline=1"));
        assert!(!has_pdf_suffix("https://example.com/page"));
    }

    #[test]
    fn test_pdf_name_from_url() {
        assert_eq!(
            pdf_name_from_url("https://example.com/files/report.pdf"),
            "report.pdf"
        );
        assert_eq!(pdf_name_from_url("https://example.com/"), "doc.pdf");
        assert_eq!(pdf_name_from_url("::not-a-url::"), "doc.pdf");
    }
}
