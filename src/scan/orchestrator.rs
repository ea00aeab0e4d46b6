use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::OnceCell;
use uuid::Uuid;
use crate::auth::RegistryAuthenticator;
use crate::config::{ScanConfig, ScanPaths};
use crate::container::{ContainerEngine, ContainerSpec, ImageHandle, LogSink};
use crate::errors::{with_retry, RetryConfig, ScanError};
use crate::models::ScanResult;
use super::command::{scanner_command, scanner_mounts};
use super::ignore::ensure_ignore_file;
use super::outcome::{ImageScan, ScanOutcome};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub image: String,
    pub remove_image_after: bool,
}

impl ScanRequest {
    pub fn new(image: impl Into<String>, remove_image_after: bool) -> Self {
        Self { image: image.into(), remove_image_after }
    }
}

/// Drives one disposable scanner container per image.
///
/// The scanner image and the ignore file are set up once per orchestrator;
/// everything else is created and torn down per scan. Scans must run one at
/// a time because every container writes to the same result file.
pub struct ScanOrchestrator {
    engine: Arc<dyn ContainerEngine>,
    config: Arc<ScanConfig>,
    paths: ScanPaths,
    auth: RegistryAuthenticator,
    scanner_image: OnceCell<ImageHandle>,
    ignore_file: OnceCell<()>,
    log_sink: LogSink,
    timeout: Duration,
    retry: RetryConfig,
}

impl ScanOrchestrator {
    pub fn new(engine: Arc<dyn ContainerEngine>, config: Arc<ScanConfig>, paths: ScanPaths) -> Self {
        let timeout = config.timeout();
        let retry = RetryConfig::new(config.max_retries());
        Self {
            engine,
            config,
            paths,
            auth: RegistryAuthenticator::from_env(),
            scanner_image: OnceCell::new(),
            ignore_file: OnceCell::new(),
            log_sink: Arc::new(|line: &str| info!(target: "scanner", "{}", line)),
            timeout,
            retry,
        }
    }

    pub fn with_authenticator(mut self, auth: RegistryAuthenticator) -> Self {
        self.auth = auth;
        self
    }

    /// Replace the default sink, which forwards scanner output to `tracing`.
    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scan every request in order. A per-image failure is recorded and the
    /// batch moves on; a fatal error (bad config, registry auth) ends the run
    /// and the remaining images are recorded as not attempted.
    pub async fn scan_all(&self, requests: &[ScanRequest]) -> Vec<ImageScan> {
        let mut scans = Vec::with_capacity(requests.len());
        let mut remaining = requests.iter();
        for request in remaining.by_ref() {
            let result = self.run_scan(request).await;
            let fatal = match &result {
                Err(e) if e.is_fatal() => {
                    error!(image = %request.image, error_type = e.classify().error_type, error = %e, "Scan run aborted");
                    true
                }
                Err(e) => {
                    warn!(image = %request.image, error_type = e.classify().error_type, error = %e, "Scan failed");
                    false
                }
                Ok(_) => false,
            };
            scans.push(ImageScan {
                image: request.image.clone(),
                outcome: ScanOutcome::from(result),
            });
            if fatal {
                break;
            }
        }

        for request in remaining {
            debug!(image = %request.image, "Skipping image after fatal error");
            scans.push(ImageScan {
                image: request.image.clone(),
                outcome: ScanOutcome::NotAttempted,
            });
        }
        scans
    }

    pub async fn run_scan(&self, request: &ScanRequest) -> Result<ScanResult, ScanError> {
        let started = Instant::now();
        info!(image = %request.image, "Starting scan");

        self.prepare().await?;
        let scanner = self.scanner_image().await?;

        let credentials = self.auth.credentials_for(&request.image);
        let target = self.engine.pull_image(&request.image, credentials).await?;

        let spec = ContainerSpec {
            name: format!("trivy-report-{}", Uuid::new_v4().simple()),
            image: scanner.container_image().to_string(),
            cmd: scanner_command(&request.image, &self.config.severities()),
            mounts: scanner_mounts(&self.paths, &self.config.docker_socket()),
        };

        let engine = &self.engine;
        let spec_ref = &spec;
        let container_id = match with_retry("create_container", &self.retry, move || {
            engine.create_container(spec_ref)
        }).await {
            Ok(id) => id,
            Err(e) => {
                self.remove_target(request, &target).await;
                return Err(e);
            }
        };

        let run = self.run_container(&container_id).await;
        self.teardown(&container_id, request, &target).await;
        let exit_code = run?;

        let result = read_result(&self.paths.result_file()).await?;
        info!(
            image = %request.image,
            exit_code,
            vulnerabilities = result.vulnerability_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scan complete"
        );
        Ok(result)
    }

    /// One-time setup plus the per-scan directory checks.
    async fn prepare(&self) -> Result<(), ScanError> {
        self.ignore_file
            .get_or_try_init(|| async {
                ensure_ignore_file(&self.paths.ignore_file(), self.config.ignore_cves()).await?;
                Ok::<(), ScanError>(())
            })
            .await?;

        tokio::fs::create_dir_all(self.paths.cache_dir()).await?;
        tokio::fs::create_dir_all(self.paths.out_dir()).await?;

        if let Some(domain) = self.config.registry_domain() {
            self.auth.authenticate(domain)?;
        }
        Ok(())
    }

    async fn scanner_image(&self) -> Result<&ImageHandle, ScanError> {
        self.scanner_image
            .get_or_try_init(|| async {
                let image = self.config.scanner_image();
                let handle = self.engine.pull_image(&image, None).await?;
                info!(image = %image, id = handle.id.as_deref().unwrap_or("-"), "Scanner image ready");
                Ok::<_, ScanError>(handle)
            })
            .await
    }

    /// Everything between create and teardown: clear the previous result,
    /// start, stream logs and wait, all bounded by the timeout.
    async fn run_container(&self, id: &str) -> Result<i64, ScanError> {
        remove_stale_output(&self.paths.result_file()).await?;

        let engine = &self.engine;
        with_retry("start_container", &self.retry, move || engine.start_container(id)).await?;
        debug!(id = %id, "Scanner container started");

        let run = async {
            if let Err(e) = self.engine.follow_logs(id, &self.log_sink).await {
                warn!(id = %id, error = %e, "Log streaming stopped early");
            }
            self.engine.wait_container(id).await
        };

        match tokio::time::timeout(self.timeout, run).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Timeout(format!(
                "Scanner did not finish within {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    /// Runs on every path once the container exists. Failures here are
    /// logged and never replace the scan's own error.
    async fn teardown(&self, id: &str, request: &ScanRequest, target: &ImageHandle) {
        if let Err(e) = self.engine.remove_container(id).await {
            warn!(id = %id, error = %e, "Failed to remove scanner container");
        }
        self.remove_target(request, target).await;
    }

    async fn remove_target(&self, request: &ScanRequest, target: &ImageHandle) {
        if !request.remove_image_after {
            return;
        }
        if let Err(e) = self.engine.remove_image(&target.reference).await {
            warn!(image = %target.reference, error = %e, "Failed to remove scanned image");
        }
    }
}

/// Delete the previous run's result so a scanner that writes nothing cannot
/// be mistaken for one that wrote the old file.
pub async fn remove_stale_output(path: &Path) -> Result<(), ScanError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed previous result file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ScanError::StaleOutput(format!(
            "{} could not be removed: {}",
            path.display(),
            e
        ))),
    }
}

pub async fn read_result(path: &Path) -> Result<ScanResult, ScanError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::OutputMissing(format!("{} was not written", path.display())));
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map_err(|e| ScanError::Parse(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_result_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_result(&dir.path().join("result.json")).await.unwrap_err();
        assert!(matches!(err, ScanError::OutputMissing(_)));
    }

    #[tokio::test]
    async fn test_read_result_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, "{\"ArtifactName\": ").unwrap();
        let err = read_result(&path).await.unwrap_err();
        assert!(matches!(err, ScanError::Parse(_)));
    }

    #[tokio::test]
    async fn test_read_result_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, r#"{"ArtifactName": "nginx:1.25", "Results": []}"#).unwrap();
        let result = read_result(&path).await.unwrap();
        assert_eq!(result.artifact_name, "nginx:1.25");
    }

    #[tokio::test]
    async fn test_remove_stale_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        remove_stale_output(&path).await.unwrap();

        std::fs::write(&path, "{}").unwrap();
        remove_stale_output(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_stale_output_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the result file cannot be removed with remove_file
        let path = dir.path().join("result.json");
        std::fs::create_dir(&path).unwrap();
        let err = remove_stale_output(&path).await.unwrap_err();
        assert!(matches!(err, ScanError::StaleOutput(_)));
    }

    #[test]
    fn test_scan_request() {
        let request = ScanRequest::new("nginx:1.25", true);
        assert_eq!(request.image, "nginx:1.25");
        assert!(request.remove_image_after);
    }
}
