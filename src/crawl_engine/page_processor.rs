//! Single-page lifecycle
//!
//! Drives one URL through navigation, auth-wall handling, per-frame text
//! extraction, access-denied classification, artifact persistence, link
//! discovery, and tab-triggered lazy content. Steps run strictly in that
//! order; there are no ordering guarantees across pages.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::Page;
use log::{debug, info, warn};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::crawl_types::PageOutcome;
use super::frontier::Frontier;
use super::link_extractor::extract_links;
use super::metrics::CrawlMetrics;
use super::pdf_pipeline::{PdfQueue, attach_pdf_interceptor};
use crate::config::CrawlConfig;
use crate::content_saver::RunDirs;
use crate::utils::constants::{
    ACCESS_DENIED_BACKOFF_SECS, DENIAL_SENTINELS, PASSWORD_FIELD_SELECTOR, TAB_SETTLE_MILLIS,
};

/// Shared state handed to every page worker.
#[derive(Clone)]
pub struct PageContext {
    pub browser: Arc<chromiumoxide::Browser>,
    pub config: Arc<CrawlConfig>,
    pub frontier: Arc<Frontier>,
    pub metrics: Arc<CrawlMetrics>,
    pub dirs: Arc<RunDirs>,
    pub pdf_queue: Arc<PdfQueue>,
}

/// Walks the frame tree from the main window and reads each frame's body
/// text. Cross-origin frames throw on document access; those are reported
/// as unreadable rather than aborting the walk.
const FRAME_TEXT_SCRIPT: &str = r#"
    (() => {
        const frames = [];
        const collect = (win) => {
            let entry = { readable: true, text: null };
            try {
                entry.text = win.document.body ? win.document.body.innerText : null;
            } catch (e) {
                entry.readable = false;
            }
            frames.push(entry);
            try {
                for (let i = 0; i < win.frames.length; i++) {
                    collect(win.frames[i]);
                }
            } catch (e) {
                // child enumeration blocked; nothing more to walk here
            }
        };
        collect(window);
        return frames;
    })()
"#;

/// Visibility probe for the post-login content container.
const CONTAINER_VISIBLE_SCRIPT_FMT: &str = r"
    (() => {
        const el = document.querySelector('{selector}');
        return !!el && el.offsetParent !== null;
    })()
";

#[derive(Debug, Deserialize)]
struct FrameText {
    readable: bool,
    text: Option<String>,
}

/// Result of the frame walk: the readable texts plus how many frames
/// refused to be read, kept visible instead of silently dropped.
#[derive(Debug, Default)]
pub struct FrameExtraction {
    pub texts: Vec<String>,
    pub unreadable_frames: usize,
}

impl FrameExtraction {
    /// Per-frame texts concatenated with blank separators; this is the
    /// page's artifact content.
    #[must_use]
    pub fn joined(&self) -> String {
        self.texts.join("\n\n")
    }
}

/// Wrap an async page operation with an explicit timeout.
///
/// Prevents indefinite hangs on CDP round trips; whether the timeout is
/// terminal is the caller's policy.
async fn with_page_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!(
            "{operation_name} timeout after {} seconds",
            timeout.as_secs()
        )),
    }
}

/// Classify extracted text as an access-denial page.
///
/// True when the first non-blank line matches one of the fixed sentinels
/// exactly.
#[must_use]
pub fn is_access_denied(text: &str) -> bool {
    let Some(first_line) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return false;
    };
    DENIAL_SENTINELS.contains(&first_line)
}

/// Process one claimed URL end to end.
///
/// Returns the page's terminal state. `Denied` means the URL was already
/// requeued into the frontier before returning. Errors are reserved for
/// failures to even obtain a page from the browser.
pub async fn process_page(ctx: &PageContext, url: &str) -> Result<PageOutcome> {
    info!("Visiting page {url}");

    let page = ctx
        .browser
        .new_page("about:blank")
        .await
        .with_context(|| format!("Failed to create page for {url}"))?;

    // The interceptor must be listening before navigation so responses
    // from the initial load are observed too.
    let interceptor = match attach_pdf_interceptor(&page, Arc::clone(&ctx.pdf_queue)).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Response interception unavailable for {url}: {e:#}");
            None
        }
    };

    let outcome = drive_page(ctx, &page, url).await;

    if let Err(e) = page.close().await {
        debug!("Failed to close page for {url}: {e}");
    }
    if let Some(handle) = interceptor {
        handle.abort();
    }

    // The denial backoff runs after the page is released so the worker
    // holds no browser resources while sleeping.
    if matches!(outcome, Ok(PageOutcome::Denied)) {
        tokio::time::sleep(Duration::from_secs(ACCESS_DENIED_BACKOFF_SECS)).await;
    }

    outcome
}

async fn drive_page(ctx: &PageContext, page: &Page, url: &str) -> Result<PageOutcome> {
    // Navigate. A timeout or error here is terminal for the page.
    let navigation = async {
        page.goto(url).await.map_err(|e| anyhow!("{e}"))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| anyhow!("{e}"))?;
        Ok(())
    };
    if let Err(e) = with_page_timeout(
        navigation,
        ctx.config.navigation_timeout(),
        "Page navigation",
    )
    .await
    {
        warn!("Error navigating to {url}: {e:#}");
        ctx.metrics.incr_failures();
        return Ok(PageOutcome::NavFailed);
    }

    // Auth wall. Every failure mode here is non-fatal: proceed with
    // whatever content is available.
    if let Err(e) = authenticate(page, ctx.config.as_ref()).await {
        warn!("Password entry failed for {url}: {e:#}");
    }

    let extraction = match extract_frame_texts(page).await {
        Ok(extraction) => {
            if extraction.unreadable_frames > 0 {
                debug!(
                    "{} unreadable frame(s) on {url}",
                    extraction.unreadable_frames
                );
            }
            extraction
        }
        Err(e) => {
            warn!("Frame text extraction failed for {url}: {e:#}");
            FrameExtraction::default()
        }
    };

    let joined = extraction.joined();
    if is_access_denied(&joined) {
        warn!("Access denied on {url} - queued for retry");
        ctx.frontier.requeue(url.to_string()).await;
        ctx.metrics.incr_retries();
        return Ok(PageOutcome::Denied);
    }

    ctx.dirs.save_page_text(url, &joined).await?;
    ctx.metrics.incr_pages_done();
    info!("Text saved: {url}");

    discover_links(ctx, page, url).await;
    click_tabs(ctx, page, url).await;

    Ok(PageOutcome::Saved)
}

/// Fill and submit the site password if an auth wall is present, then
/// wait (bounded) for the wall to clear. Each timeout is accepted as
/// partial success.
async fn authenticate(page: &Page, config: &CrawlConfig) -> Result<()> {
    let Ok(field) = page.find_element(PASSWORD_FIELD_SELECTOR).await else {
        return Ok(()); // no auth wall
    };

    debug!("Auth wall detected, submitting password");
    field
        .click()
        .await
        .map_err(|e| anyhow!("focus password field: {e}"))?
        .type_str(config.password().unwrap_or_default())
        .await
        .map_err(|e| anyhow!("fill password field: {e}"))?
        .press_key("Enter")
        .await
        .map_err(|e| anyhow!("submit password: {e}"))?;

    if let Err(e) = wait_for_detach(page, PASSWORD_FIELD_SELECTOR, config.auth_detach_timeout()).await
    {
        warn!("Timeout waiting for password field - accepting partial content - {e}");
        return Ok(());
    }
    if let Err(e) = wait_for_visible(
        page,
        config.auth_container_selector(),
        config.auth_container_timeout(),
    )
    .await
    {
        warn!("Timeout waiting for content container - accepting partial content - {e}");
        return Ok(());
    }
    if let Err(e) = wait_for_settle(page, config.auth_settle_timeout()).await {
        warn!("Timeout waiting for network settle - accepting partial content - {e}");
    }
    Ok(())
}

/// Poll until the selector no longer resolves (element detached).
async fn wait_for_detach(page: &Page, selector: &str, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if page.find_element(selector).await.is_err() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    Err(anyhow!("'{selector}' still attached after {timeout:?}"))
}

/// Poll until the selector resolves to a visible element.
async fn wait_for_visible(page: &Page, selector: &str, timeout: Duration) -> Result<()> {
    let script = CONTAINER_VISIBLE_SCRIPT_FMT.replace("{selector}", selector);
    let start = Instant::now();
    while start.elapsed() < timeout {
        let visible = page
            .evaluate(script.as_str())
            .await
            .ok()
            .and_then(|res| res.into_value::<bool>().ok())
            .unwrap_or(false);
        if visible {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    Err(anyhow!("'{selector}' not visible after {timeout:?}"))
}

/// Poll `document.readyState` until the page reports complete.
async fn wait_for_settle(page: &Page, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        let ready = page
            .evaluate("document.readyState === 'complete'")
            .await
            .ok()
            .and_then(|res| res.into_value::<bool>().ok())
            .unwrap_or(false);
        if ready {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    Err(anyhow!("readyState incomplete after {timeout:?}"))
}

/// Read every frame's body text in one evaluation.
async fn extract_frame_texts(page: &Page) -> Result<FrameExtraction> {
    let result = page
        .evaluate(FRAME_TEXT_SCRIPT)
        .await
        .map_err(|e| anyhow!("frame walk evaluation: {e}"))?;
    let frames: Vec<FrameText> = result
        .into_value()
        .map_err(|e| anyhow!("frame walk result: {e}"))?;

    let mut extraction = FrameExtraction::default();
    for frame in frames {
        if !frame.readable {
            extraction.unreadable_frames += 1;
            continue;
        }
        if let Some(text) = frame.text {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                extraction.texts.push(trimmed.to_string());
            }
        }
    }
    Ok(extraction)
}

/// Parse the rendered page for same-domain links and feed survivors into
/// the frontier.
async fn discover_links(ctx: &PageContext, page: &Page, url: &str) {
    let html = match page.content().await {
        Ok(html) => html,
        Err(e) => {
            warn!("Failed to read rendered HTML for {url}: {e}");
            return;
        }
    };

    let links = extract_links(&html, url, ctx.config.start_url());
    let mut added = 0usize;
    for link in links {
        if ctx.frontier.discover(link).await {
            added += 1;
        }
    }
    debug!("Discovered {added} new link(s) on {url}");
}

/// Click through tab-like elements so lazily loaded responses reach the
/// PDF interceptor. Click failures are counted but never abort the page.
async fn click_tabs(ctx: &PageContext, page: &Page, url: &str) {
    let tabs = match page.find_elements("[role=\"tab\"]").await {
        Ok(tabs) => tabs,
        Err(_) => return, // selector resolved nothing
    };

    for tab in tabs {
        match tab.click().await {
            Ok(_) => {
                // Give any triggered response time to reach the interceptor
                tokio::time::sleep(Duration::from_millis(TAB_SETTLE_MILLIS)).await;
            }
            Err(e) => {
                ctx.metrics.incr_failures();
                warn!("Tab click failed for {url}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_sentinels_match_exactly() {
        assert!(is_access_denied("ERROR: FORBIDDEN"));
        assert!(is_access_denied("Password Protected"));
        assert!(!is_access_denied("error: forbidden"));
        assert!(!is_access_denied("Password Protected Area"));
        assert!(!is_access_denied("Welcome\nPassword Protected"));
    }

    #[test]
    fn test_denial_uses_first_non_blank_line() {
        assert!(is_access_denied("\n   \nERROR: FORBIDDEN\nmore text"));
        assert!(is_access_denied("  Password Protected  "));
        assert!(!is_access_denied(""));
        assert!(!is_access_denied("\n \n"));
    }

    #[test]
    fn test_joined_concatenates_with_blank_separator() {
        let extraction = FrameExtraction {
            texts: vec!["main".into(), "iframe".into()],
            unreadable_frames: 1,
        };
        assert_eq!(extraction.joined(), "main\n\niframe");
    }
}
