// gatecrawl CLI
//
// Runs one crawl of a password-protected site to completion and prints
// the resulting output directory. Downstream tooling (diffing, summaries,
// delivery) consumes the output tree; this binary only produces it.

use anyhow::{Context, Result};
use clap::Parser;
use gatecrawl::CrawlConfig;
use log::info;

/// Crawl a password-protected site into a timestamped output tree.
#[derive(Debug, Parser)]
#[command(name = "gatecrawl", version, about)]
struct Cli {
    /// URL the crawl starts from; its host defines the crawl scope
    #[arg(long)]
    start_url: String,

    /// Site password submitted at auth walls
    /// (falls back to the GATECRAWL_PASSWORD environment variable)
    #[arg(long)]
    password: Option<String>,

    /// URL or URL prefix to never fetch; repeatable
    #[arg(long = "blacklist", value_name = "URL")]
    blacklist: Vec<String>,

    /// Number of concurrent page workers
    #[arg(long, default_value_t = gatecrawl::utils::DEFAULT_PAGE_WORKERS)]
    page_workers: usize,

    /// Number of PDF download workers
    #[arg(long, default_value_t = gatecrawl::utils::DEFAULT_PDF_WORKERS)]
    pdf_workers: usize,

    /// Directory under which the timestamped run directory is created
    #[arg(long, default_value = "results")]
    output_root: std::path::PathBuf,

    /// Run the browser with a visible window (debugging aid)
    #[arg(long)]
    headed: bool,

    /// CSS selector that marks a completed login
    #[arg(long)]
    auth_container: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let password = cli
        .password
        .or_else(|| std::env::var("GATECRAWL_PASSWORD").ok());

    let mut builder = CrawlConfig::builder()
        .output_root(cli.output_root)
        .start_url(cli.start_url)
        .blacklist(cli.blacklist)
        .page_workers(cli.page_workers)
        .pdf_workers(cli.pdf_workers)
        .headless(!cli.headed);
    if let Some(password) = password {
        builder = builder.password(password);
    }
    if let Some(selector) = cli.auth_container {
        builder = builder.auth_container_selector(selector);
    }
    let config = builder.build().context("Invalid configuration")?;

    let summary = gatecrawl::crawl(config)
        .await
        .context("Crawl did not complete")?;

    info!(
        "Finished: {} URL(s) visited, {}",
        summary.urls_visited, summary.metrics
    );
    println!("{}", summary.run_dir.display());
    Ok(())
}
