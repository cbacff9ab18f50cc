//! Filename derivation for crawl artifacts
//!
//! Artifact names are a pure function of the source URL so that two crawl
//! runs of the same site produce directly comparable output trees.

use once_cell::sync::Lazy;
use regex::Regex;

use super::constants::MAX_FILENAME_LEN;

/// Runs of anything outside `[A-Za-z0-9_-]` collapse to one underscore.
static NON_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\-]+").unwrap_or_else(|e| panic!("invalid filename regex: {e}"))
});

/// Derive a filesystem-safe name from a URL.
///
/// Strips the URL to an alphanumeric/`-`/`_` charset (runs of other
/// characters become a single `_`) and truncates to [`MAX_FILENAME_LEN`]
/// characters. The function is idempotent:
/// `sanitize_url_filename(sanitize_url_filename(u)) == sanitize_url_filename(u)`.
///
/// Distinct URLs can collide after stripping and truncation; collisions are
/// not detected and the later write wins.
#[must_use]
pub fn sanitize_url_filename(url: &str) -> String {
    let clean = NON_FILENAME_CHARS.replace_all(url, "_");
    safe_truncate_chars(&clean, MAX_FILENAME_LEN).to_string()
}

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Respects UTF-8 character boundaries and never panics, even with
/// multi-byte characters.
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_url_punctuation() {
        assert_eq!(
            sanitize_url_filename("https://example.com/docs/page?id=1"),
            "https_example_com_docs_page_id_1"
        );
    }

    #[test]
    fn test_sanitize_collapses_runs() {
        assert_eq!(sanitize_url_filename("a:// ::b"), "a_b");
    }

    #[test]
    fn test_sanitize_preserves_allowed_charset() {
        assert_eq!(sanitize_url_filename("report-2024_v2"), "report-2024_v2");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let long = "x".repeat(400);
        let urls = [
            "https://example.com/a/b#frag",
            "http://sub.example.com:8080/x?y=z&w=1",
            "already_clean-name",
            long.as_str(),
        ];
        for url in urls {
            let once = sanitize_url_filename(url);
            assert_eq!(sanitize_url_filename(&once), once, "not idempotent for {url}");
        }
    }

    #[test]
    fn test_sanitize_truncates_to_cap() {
        let long = format!("https://example.com/{}", "a".repeat(500));
        assert_eq!(sanitize_url_filename(&long).chars().count(), MAX_FILENAME_LEN);
    }

    #[test]
    fn test_safe_truncate_multibyte() {
        assert_eq!(safe_truncate_chars("héllo", 2), "hé");
        assert_eq!(safe_truncate_chars("hi", 100), "hi");
    }
}
