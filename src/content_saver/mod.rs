//! Artifact persistence
//!
//! One directory per crawl run, named by a sortable timestamp, holding the
//! page text artifacts at the top level and PDF binaries plus their
//! extracted text in a `pdf/` subdirectory. Filenames are a pure function
//! of the source URL; no metadata files are written.

use anyhow::{Context, Result};
use chrono::Local;
use log::debug;
use std::path::{Path, PathBuf};

use crate::utils::string_utils::sanitize_url_filename;

/// Format of the per-run directory name. Sorts lexicographically in crawl
/// order, which the downstream diff tooling relies on.
const RUN_DIR_FORMAT: &str = "%y%m%d-%H%M%S";

/// The output tree of a single crawl run.
#[derive(Debug, Clone)]
pub struct RunDirs {
    run_dir: PathBuf,
    pdf_dir: PathBuf,
}

impl RunDirs {
    /// Create the timestamped run directory and its `pdf/` subdirectory
    /// under `output_root`.
    pub async fn create(output_root: &Path) -> Result<Self> {
        let run_dir = output_root.join(Local::now().format(RUN_DIR_FORMAT).to_string());
        let pdf_dir = run_dir.join("pdf");
        tokio::fs::create_dir_all(&pdf_dir)
            .await
            .with_context(|| format!("Failed to create run directory {}", run_dir.display()))?;
        debug!(target: "gatecrawl::saver", "Run directory: {}", run_dir.display());
        Ok(Self { run_dir, pdf_dir })
    }

    /// Build over an existing directory pair. Used by tests.
    #[must_use]
    pub fn at(run_dir: PathBuf) -> Self {
        let pdf_dir = run_dir.join("pdf");
        Self { run_dir, pdf_dir }
    }

    /// The timestamped run directory.
    #[must_use]
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// The subdirectory holding PDF binaries and their text artifacts.
    #[must_use]
    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }

    /// Persist one page's extracted text under its sanitized URL name.
    /// Returns the written path.
    pub async fn save_page_text(&self, url: &str, text: &str) -> Result<PathBuf> {
        let path = self
            .run_dir
            .join(format!("{}.txt", sanitize_url_filename(url)));
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write page text {}", path.display()))?;
        Ok(path)
    }

    /// Path a PDF binary of this name would occupy.
    #[must_use]
    pub fn pdf_binary_path(&self, name: &str) -> PathBuf {
        self.pdf_dir.join(name)
    }

    /// Path of the text artifact sitting beside a PDF binary.
    #[must_use]
    pub fn pdf_text_path(&self, name: &str) -> PathBuf {
        self.pdf_dir.join(format!("{name}.txt"))
    }

    /// Whether a binary of this name already exists (write-once dedup,
    /// content-addressed by name, not by hash).
    pub async fn pdf_exists(&self, name: &str) -> bool {
        tokio::fs::try_exists(self.pdf_binary_path(name))
            .await
            .unwrap_or(false)
    }

    /// Persist a PDF binary.
    pub async fn write_pdf_binary(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.pdf_binary_path(name);
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write PDF binary {}", path.display()))?;
        Ok(path)
    }

    /// Persist a PDF's extracted text beside its binary.
    pub async fn write_pdf_text(&self, name: &str, text: &str) -> Result<PathBuf> {
        let path = self.pdf_text_path(name);
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write PDF text {}", path.display()))?;
        Ok(path)
    }
}
