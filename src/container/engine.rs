use std::sync::Arc;

use async_trait::async_trait;
use crate::auth::RegistryCredentials;
use crate::errors::ScanError;

/// Receives scanner output one line at a time.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// A pulled image. `id` is preferred when creating containers so a tag
/// moving mid-run does not change the scanner under us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub reference: String,
    pub id: Option<String>,
}

impl ImageHandle {
    pub fn container_image(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.reference)
    }
}

/// `host:container` bind mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: String,
    pub container: String,
}

impl Mount {
    pub fn new(host: impl Into<String>, container: impl Into<String>) -> Self {
        Self { host: host.into(), container: container.into() }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.container)
    }
}

#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub cmd: Vec<String>,
    pub mounts: Vec<Mount>,
}

/// Operations the scan lifecycle needs from a container engine.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    async fn pull_image(
        &self,
        image: &str,
        credentials: Option<RegistryCredentials>,
    ) -> Result<ImageHandle, ScanError>;

    async fn remove_image(&self, image: &str) -> Result<(), ScanError>;

    /// Returns the new container's ID.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, ScanError>;

    async fn start_container(&self, id: &str) -> Result<(), ScanError>;

    /// Forward combined stdout/stderr until the container stops.
    async fn follow_logs(&self, id: &str, sink: &LogSink) -> Result<(), ScanError>;

    /// Block until the container exits and return its exit code.
    async fn wait_container(&self, id: &str) -> Result<i64, ScanError>;

    /// Force-remove, killing the container if still running.
    async fn remove_container(&self, id: &str) -> Result<(), ScanError>;
}
