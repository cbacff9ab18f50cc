//! Asynchronous PDF interception and download pipeline
//!
//! Two producers feed one bounded job queue: per-page response
//! interceptors (any completed network response with a PDF MIME type) and
//! the scheduler forwarding `.pdf`-suffixed links. A separate, smaller
//! worker pool consumes the queue until it receives a poison pill.
//!
//! The queue tracks outstanding jobs explicitly so shutdown can
//! distinguish "drained" (every enqueued job acknowledged by a worker)
//! from merely "empty": producers may still be active while the channel
//! is momentarily empty.

use anyhow::{Context, Result, anyhow, bail};
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::network::EventResponseReceived;
use dashmap::DashSet;
use futures::StreamExt;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify, mpsc};
use tokio::task::JoinHandle;

use super::crawl_types::PdfJob;
use super::metrics::CrawlMetrics;
use crate::content_saver::RunDirs;
use crate::utils::url_utils::pdf_name_from_url;

/// Shared handle to the PDF workers' receiving end.
pub type SharedJobReceiver = Arc<Mutex<mpsc::Receiver<PdfJob>>>;

/// Bounded job queue with an explicit drain signal.
#[derive(Debug)]
pub struct PdfQueue {
    tx: mpsc::Sender<PdfJob>,
    /// Fetch jobs enqueued but not yet acknowledged by a worker.
    outstanding: AtomicUsize,
    drained: Notify,
}

impl PdfQueue {
    /// Create the queue and the receiver its workers will share.
    #[must_use]
    pub fn new(capacity: usize) -> (Arc<Self>, SharedJobReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        let queue = Arc::new(Self {
            tx,
            outstanding: AtomicUsize::new(0),
            drained: Notify::new(),
        });
        (queue, Arc::new(Mutex::new(rx)))
    }

    /// Enqueue a fetch job. Awaits when the queue is at capacity.
    pub async fn enqueue(&self, url: String) -> Result<()> {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        if let Err(e) = self.tx.send(PdfJob::Fetch(url)).await {
            // Undo the reservation so join() can still complete
            self.ack();
            return Err(anyhow!("PDF job queue closed: {e}"));
        }
        Ok(())
    }

    /// Acknowledge one fetch job as finished (in any terminal state).
    pub fn ack(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Number of enqueued-but-unacknowledged fetch jobs.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Wait until every enqueued job has been acknowledged.
    ///
    /// Callers must ensure no further producers are active, otherwise the
    /// queue can refill after this returns.
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            if self.outstanding.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Enqueue one poison pill per worker. Called after [`PdfQueue::join`].
    pub async fn shutdown(&self, workers: usize) {
        for _ in 0..workers {
            if self.tx.send(PdfJob::Shutdown).await.is_err() {
                warn!("PDF job queue closed before shutdown pills were delivered");
                return;
            }
        }
    }
}

/// Everything a PDF worker needs besides the receiver.
#[derive(Clone)]
pub struct PdfContext {
    pub queue: Arc<PdfQueue>,
    pub client: reqwest::Client,
    pub dirs: Arc<RunDirs>,
    pub metrics: Arc<CrawlMetrics>,
    /// Derived filenames claimed by some job, so a PDF reached both by
    /// interception and by a direct link is fetched at most once.
    pub claimed: Arc<DashSet<String>>,
}

/// Attach a response interceptor to a page.
///
/// The returned task forwards every completed response whose MIME type is
/// PDF into the job queue, regardless of which worker owns the page. It
/// runs until the page's event stream ends; abort it after closing the
/// page.
pub async fn attach_pdf_interceptor(
    page: &Page,
    queue: Arc<PdfQueue>,
) -> Result<JoinHandle<()>> {
    let mut events = page
        .event_listener::<EventResponseReceived>()
        .await
        .context("Failed to attach response listener")?;

    Ok(tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let mime = event.response.mime_type.to_ascii_lowercase();
            if !mime.contains("application/pdf") {
                continue;
            }
            let url = event.response.url.clone();
            debug!(target: "gatecrawl::pdf", "Intercepted PDF response: {url}");
            if let Err(e) = queue.enqueue(url).await {
                warn!("PDF interceptor stopped: {e}");
                break;
            }
        }
    }))
}

/// Spawn the PDF worker pool.
///
/// Each worker loops on the shared receiver until it takes a poison pill.
#[must_use]
pub fn spawn_pdf_workers(
    ctx: PdfContext,
    receiver: SharedJobReceiver,
    count: usize,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let ctx = ctx.clone();
            let receiver = Arc::clone(&receiver);
            tokio::spawn(async move {
                pdf_worker(ctx, receiver, id).await;
            })
        })
        .collect()
}

async fn pdf_worker(ctx: PdfContext, receiver: SharedJobReceiver, id: usize) {
    debug!(target: "gatecrawl::pdf", "PDF worker {id} started");
    loop {
        let job = { receiver.lock().await.recv().await };
        match job {
            Some(PdfJob::Fetch(url)) => {
                run_pdf_job(&ctx, &url).await;
                ctx.queue.ack();
            }
            Some(PdfJob::Shutdown) | None => break,
        }
    }
    debug!(target: "gatecrawl::pdf", "PDF worker {id} exiting");
}

/// Process one job: claim, fetch, persist, extract. A fetch/persist
/// failure is retried exactly once with a fresh request; the second
/// failure is permanent for this job.
pub async fn run_pdf_job(ctx: &PdfContext, url: &str) {
    let name = pdf_name_from_url(url);

    // Claim the derived name before any fetch so a duplicate job (e.g.
    // interception plus a direct link) never proceeds to persist.
    if !ctx.claimed.insert(name.clone()) {
        debug!(target: "gatecrawl::pdf", "Skipping already-claimed PDF: {name}");
        return;
    }

    match fetch_and_persist(ctx, url, &name).await {
        Ok(()) => {}
        Err(first_err) => {
            ctx.metrics.incr_retries();
            warn!(
                "Initial PDF fetch failed for {url}: {first_err:#}. Retrying with fresh request"
            );
            if let Err(retry_err) = fetch_and_persist(ctx, url, &name).await {
                ctx.metrics.incr_failures();
                ctx.claimed.remove(&name);
                error!("PDF fetch retry failed for {url}: {retry_err:#}");
            }
        }
    }
}

/// One fetch attempt: direct idempotent GET, write-once dedup, binary
/// persist, then text extraction in an isolated blocking context.
async fn fetch_and_persist(ctx: &PdfContext, url: &str, name: &str) -> Result<()> {
    if ctx.dirs.pdf_exists(name).await {
        info!("Skipping PDF download - already exists: {name}");
        return Ok(());
    }

    let response = ctx
        .client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request failed for {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("HTTP error {status} fetching PDF from {url}");
    }

    // A direct `.pdf` link can resolve to an HTML error page; don't
    // persist those as binaries.
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !content_type.is_empty() && !content_type.contains("application/pdf") {
        debug!(target: "gatecrawl::pdf", "Skipped non-PDF content-type '{content_type}' for {url}");
        return Ok(());
    }

    let data = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read PDF body from {url}"))?;

    let binary_path = ctx.dirs.write_pdf_binary(name, &data).await?;

    // Extraction is CPU-bound; run it off the async runtime so other
    // pages and fetches keep moving.
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&binary_path)
            .map_err(|e| anyhow!("PDF text extraction failed: {e}"))
    })
    .await
    .map_err(|e| anyhow!("Extraction task join error: {e}"))??;

    ctx.dirs.write_pdf_text(name, &text).await?;

    ctx.metrics.incr_pdfs_downloaded();
    info!("PDF saved: {name}");
    Ok(())
}
