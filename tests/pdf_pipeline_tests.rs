//! PDF pipeline behavior against a real HTTP server
//!
//! Covers the fetch-retry-once policy, write-once dedup, and the claim
//! set that keeps a PDF reached by two routes from being fetched twice.

use dashmap::DashSet;
use gatecrawl::RunDirs;
use gatecrawl::crawl_engine::pdf_pipeline::{PdfContext, PdfQueue, run_pdf_job};
use gatecrawl::crawl_engine::CrawlMetrics;
use std::sync::Arc;
use tempfile::TempDir;

/// Build a tiny but structurally valid PDF: one empty page, one empty
/// content stream, correct xref offsets. Extracting its text yields an
/// empty string rather than an error.
fn minimal_pdf() -> Vec<u8> {
    let objects = [
        "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
        "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_string(),
        concat!(
            "3 0 obj\n",
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] ",
            "/Resources << >> /Contents 4 0 R >>\n",
            "endobj\n"
        )
        .to_string(),
        "4 0 obj\n<< /Length 0 >>\nstream\n\nendstream\nendobj\n".to_string(),
    ];

    let mut body = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for obj in &objects {
        offsets.push(body.len());
        body.extend_from_slice(obj.as_bytes());
    }

    let xref_offset = body.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    body.extend_from_slice(xref.as_bytes());
    body.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    body
}

async fn test_context(root: &TempDir) -> PdfContext {
    let (queue, _receiver) = PdfQueue::new(8);
    PdfContext {
        queue,
        client: reqwest::Client::new(),
        dirs: Arc::new(RunDirs::create(root.path()).await.expect("run dirs")),
        metrics: Arc::new(CrawlMetrics::new()),
        claimed: Arc::new(DashSet::new()),
    }
}

#[tokio::test]
async fn test_pdf_download_persists_binary_and_text() {
    let root = TempDir::new().expect("tempdir");
    let ctx = test_context(&root).await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/files/report.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(minimal_pdf())
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/files/report.pdf", server.url());
    run_pdf_job(&ctx, &url).await;

    mock.assert_async().await;
    assert!(ctx.dirs.pdf_dir().join("report.pdf").is_file());
    assert!(ctx.dirs.pdf_dir().join("report.pdf.txt").is_file());

    let snap = ctx.metrics.snapshot();
    assert_eq!(snap.pdfs_downloaded, 1);
    assert_eq!(snap.retries, 0);
    assert_eq!(snap.failures, 0);
}

#[tokio::test]
async fn test_duplicate_jobs_yield_one_fetch() {
    let root = TempDir::new().expect("tempdir");
    let ctx = test_context(&root).await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/dup.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(minimal_pdf())
        .expect(1)
        .create_async()
        .await;

    // Same PDF reaches the queue twice: once via interception, once via a
    // direct link. Only the first job may proceed to fetch and persist.
    let url = format!("{}/dup.pdf", server.url());
    run_pdf_job(&ctx, &url).await;
    run_pdf_job(&ctx, &url).await;

    mock.assert_async().await;
    assert_eq!(ctx.metrics.snapshot().pdfs_downloaded, 1);
}

#[tokio::test]
async fn test_existing_binary_is_never_refetched() {
    let root = TempDir::new().expect("tempdir");
    let ctx = test_context(&root).await;

    ctx.dirs
        .write_pdf_binary("cached.pdf", &minimal_pdf())
        .await
        .expect("seed binary");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/cached.pdf")
        .expect(0)
        .create_async()
        .await;

    let url = format!("{}/cached.pdf", server.url());
    run_pdf_job(&ctx, &url).await;

    mock.assert_async().await;
    let snap = ctx.metrics.snapshot();
    assert_eq!(snap.pdfs_downloaded, 0);
    assert_eq!(snap.failures, 0);
}

#[tokio::test]
async fn test_fetch_failure_retries_exactly_once() {
    let root = TempDir::new().expect("tempdir");
    let ctx = test_context(&root).await;

    let mut server = mockito::Server::new_async().await;
    // Two hits and no more: the initial fetch plus exactly one retry
    let mock = server
        .mock("GET", "/broken.pdf")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let url = format!("{}/broken.pdf", server.url());
    run_pdf_job(&ctx, &url).await;

    mock.assert_async().await;
    let snap = ctx.metrics.snapshot();
    assert_eq!(snap.retries, 1);
    assert_eq!(snap.failures, 1);
    assert_eq!(snap.pdfs_downloaded, 0);
    assert!(!ctx.dirs.pdf_dir().join("broken.pdf").is_file());
    // Permanent failure releases the claim
    assert!(!ctx.claimed.contains("broken.pdf"));
}

#[tokio::test]
async fn test_non_pdf_content_type_is_skipped_quietly() {
    let root = TempDir::new().expect("tempdir");
    let ctx = test_context(&root).await;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/fake.pdf")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>not a pdf</html>")
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/fake.pdf", server.url());
    run_pdf_job(&ctx, &url).await;

    mock.assert_async().await;
    let snap = ctx.metrics.snapshot();
    assert_eq!(snap.pdfs_downloaded, 0);
    assert_eq!(snap.failures, 0);
    assert!(!ctx.dirs.pdf_dir().join("fake.pdf").is_file());
}
