use std::path::Path;
use crate::errors::ScanError;
use crate::models::VulnerabilitySummary;
use crate::scan::{ImageScan, ScanOutcome};
use super::aggregator::to_report_fragment;
use super::formatter::{format_failures, render_summary};
use tracing::info;

/// Folds per-image outcomes of a batch into issue text and the
/// cross-image summary.
#[derive(Debug, Default)]
pub struct ReportAssembler {
    summary: VulnerabilitySummary,
    fragments: Vec<String>,
    failures: Vec<(String, String)>,
    clean: Vec<String>,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one image. Returns that image's issue fragment, if any.
    pub fn record(&mut self, scan: &ImageScan) -> Option<&str> {
        match &scan.outcome {
            ScanOutcome::FindingsPresent(result) => {
                let fragment = to_report_fragment(result, &mut self.summary)?;
                self.fragments.push(fragment);
                self.fragments.last().map(String::as_str)
            }
            ScanOutcome::Clean(_) => {
                self.clean.push(scan.image.clone());
                None
            }
            ScanOutcome::OrchestrationFailed(e) => {
                self.failures.push((scan.image.clone(), e.to_string()));
                None
            }
            ScanOutcome::NotAttempted => {
                self.failures.push((scan.image.clone(), "Not attempted: run aborted".to_string()));
                None
            }
        }
    }

    pub fn summary(&self) -> &VulnerabilitySummary {
        &self.summary
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    pub fn clean_images(&self) -> &[String] {
        &self.clean
    }

    /// All issue fragments joined, or `None` when every image was clean.
    pub fn issue_text(&self) -> Option<String> {
        if self.fragments.is_empty() {
            None
        } else {
            Some(self.fragments.join("\n"))
        }
    }

    /// Cross-image summary table followed by a failure section when any
    /// image could not be scanned.
    pub fn summary_text(&self) -> String {
        let mut text = render_summary(&self.summary);
        if !self.failures.is_empty() {
            text.push('\n');
            text.push_str(&format_failures(&self.failures));
        }
        text
    }

    pub async fn write_issue(&self, path: &Path) -> Result<bool, ScanError> {
        match self.issue_text() {
            Some(text) => {
                tokio::fs::write(path, text).await?;
                info!(path = %path.display(), "Issue text written");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn write_summary(&self, path: &Path) -> Result<(), ScanError> {
        tokio::fs::write(path, self.summary_text()).await?;
        info!(path = %path.display(), entries = self.summary.len(), "Summary written");
        Ok(())
    }
}
