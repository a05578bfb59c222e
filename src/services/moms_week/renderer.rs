use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{bail, Context};
use async_trait::async_trait;
use tokio::process::Command;

/// Turns an HTML document into a PDF file at `output`.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str, output: &Path) -> anyhow::Result<()>;
}

/// Launches headless Chromium once per render and prints the page to PDF.
pub struct ChromiumRenderer {
    binary: PathBuf,
}

impl ChromiumRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render(&self, html: &str, output: &Path) -> anyhow::Result<()> {
        let page = tempfile::Builder::new()
            .prefix("diario-semanal-")
            .suffix(".html")
            .tempfile()
            .context("creating temporary HTML file")?;
        tokio::fs::write(page.path(), html)
            .await
            .context("writing temporary HTML file")?;

        let started = std::time::Instant::now();
        let result = Command::new(&self.binary)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", page.path().display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("launching {}", self.binary.display()))?;

        if !result.status.success() {
            bail!(
                "chromium exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }
        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            bail!("chromium finished but {} was not written", output.display());
        }

        tracing::debug!(
            output = %output.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "PDF rendered"
        );
        Ok(())
    }
}
