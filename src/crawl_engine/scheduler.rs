//! Worker pool and crawl orchestration
//!
//! Owns the full crawl lifecycle: output tree, browser, PDF pipeline and
//! page worker pool, and the shutdown sequence that guarantees a PDF
//! discovered by the very last page is never lost.

use dashmap::DashSet;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::crawl_types::{CrawlError, CrawlResult, PageOutcome};
use super::frontier::Frontier;
use super::metrics::{CrawlMetrics, MetricsSnapshot};
use super::page_processor::{PageContext, process_page};
use super::pdf_pipeline::{PdfContext, PdfQueue, spawn_pdf_workers};
use crate::browser_setup::launch_browser;
use crate::config::CrawlConfig;
use crate::content_saver::RunDirs;
use crate::utils::constants::{CHROME_USER_AGENT, FRONTIER_IDLE_POLL_MILLIS, PDF_QUEUE_CAPACITY};
use crate::utils::url_utils::has_pdf_suffix;

/// What a finished crawl hands back to the caller.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// The timestamped directory this run wrote into.
    pub run_dir: PathBuf,
    /// Number of distinct URLs that were claimed at least once.
    pub urls_visited: usize,
    /// Final counter values.
    pub metrics: MetricsSnapshot,
}

/// Run one crawl to completion.
///
/// Batch semantics: returns only when the frontier is exhausted AND the
/// PDF queue has fully drained. No single page or job failure aborts the
/// run.
pub async fn run_crawl(config: CrawlConfig) -> CrawlResult<CrawlSummary> {
    let dirs = Arc::new(
        RunDirs::create(config.output_root())
            .await
            .map_err(|e| CrawlError::Storage(format!("{e:#}")))?,
    );
    info!("Crawl output: {}", dirs.run_dir().display());

    let frontier = Arc::new(Frontier::new(
        config.start_url().to_string(),
        config.blacklist().to_vec(),
    ));
    let metrics = Arc::new(CrawlMetrics::new());

    let (browser, handler_task, user_data_dir) =
        launch_browser(config.headless(), config.chrome_data_dir().cloned())
            .await
            .map_err(|e| CrawlError::Browser(format!("{e:#}")))?;
    let browser = Arc::new(browser);

    // One direct-request context shared by every PDF fetch.
    let client = reqwest::Client::builder()
        .user_agent(CHROME_USER_AGENT)
        .build()
        .map_err(|e| CrawlError::Config(format!("HTTP client: {e}")))?;

    let (pdf_queue, job_receiver) = PdfQueue::new(PDF_QUEUE_CAPACITY);
    let pdf_ctx = PdfContext {
        queue: Arc::clone(&pdf_queue),
        client,
        dirs: Arc::clone(&dirs),
        metrics: Arc::clone(&metrics),
        claimed: Arc::new(DashSet::new()),
    };
    let pdf_workers = spawn_pdf_workers(pdf_ctx, job_receiver, config.pdf_workers());

    let page_ctx = PageContext {
        browser: Arc::clone(&browser),
        config: Arc::new(config.clone()),
        frontier: Arc::clone(&frontier),
        metrics: Arc::clone(&metrics),
        dirs: Arc::clone(&dirs),
        pdf_queue: Arc::clone(&pdf_queue),
    };
    let page_workers = spawn_page_workers(page_ctx, config.page_workers());
    for worker in page_workers {
        if let Err(e) = worker.await {
            warn!("Page worker panicked: {e}");
        }
    }

    // Page workers are done, so interception has stopped producing; wait
    // for every enqueued job to be acknowledged before the pills go in.
    debug!("Frontier exhausted; draining PDF queue");
    pdf_queue.join().await;
    pdf_queue.shutdown(config.pdf_workers()).await;
    for worker in pdf_workers {
        if let Err(e) = worker.await {
            warn!("PDF worker panicked: {e}");
        }
    }

    release_browser(browser, handler_task, user_data_dir).await;

    let summary = CrawlSummary {
        run_dir: dirs.run_dir().to_path_buf(),
        urls_visited: frontier.visited().await.len(),
        metrics: metrics.snapshot(),
    };
    info!("Crawl complete: {}", summary.metrics);
    Ok(summary)
}

fn spawn_page_workers(ctx: PageContext, count: usize) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                page_worker(ctx, id).await;
            })
        })
        .collect()
}

/// One page worker: claim, dispatch, log, repeat.
///
/// Exit requires frontier exhaustion (empty pending AND zero in-flight
/// claims), never pending length alone; a sibling worker mid-navigation
/// may be about to discover new links.
async fn page_worker(ctx: PageContext, id: usize) {
    debug!(target: "gatecrawl::pool", "Page worker {id} started");
    loop {
        let Some(url) = ctx.frontier.claim().await else {
            if ctx.frontier.is_exhausted().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(FRONTIER_IDLE_POLL_MILLIS)).await;
            continue;
        };

        dispatch(&ctx, &url).await;

        ctx.metrics.set_pages_queued(ctx.frontier.pending_len().await);
        info!("Metrics: {}", ctx.metrics.snapshot());
    }
    debug!(target: "gatecrawl::pool", "Page worker {id} exiting");
}

async fn dispatch(ctx: &PageContext, url: &str) {
    // A .pdf link gets a direct GET via the pipeline instead of a page
    // render.
    if has_pdf_suffix(url) {
        if let Err(e) = ctx.pdf_queue.enqueue(url.to_string()).await {
            ctx.metrics.incr_failures();
            warn!("Failed to enqueue PDF link {url}: {e:#}");
        }
        ctx.frontier.mark_done(url).await;
        return;
    }

    match process_page(ctx, url).await {
        // A denied page was requeued by the processor and stays claimable
        Ok(PageOutcome::Denied) => {}
        Ok(_) => ctx.frontier.mark_done(url).await,
        Err(e) => {
            ctx.metrics.incr_failures();
            warn!("Error processing page {url}: {e:#}");
            ctx.frontier.mark_done(url).await;
        }
    }
}

/// Close the shared browsing session and remove its profile directory.
async fn release_browser(
    browser: Arc<chromiumoxide::Browser>,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
) {
    match Arc::try_unwrap(browser) {
        Ok(mut browser) => {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {e}");
            }
            // Wait for the process to fully exit before removing its profile
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
        }
        Err(arc) => {
            warn!(
                "Browser still has {} strong references, close deferred to drop",
                Arc::strong_count(&arc)
            );
        }
    }

    handler_task.abort();
    if let Err(e) = handler_task.await
        && !e.is_cancelled()
    {
        warn!("Browser handler task failed during abort: {e}");
    }

    if let Err(e) = std::fs::remove_dir_all(&user_data_dir) {
        debug!(
            "Could not remove browser profile {}: {e}",
            user_data_dir.display()
        );
    }
}
