use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, RemoveContainerOptions, StartContainerOptions,
};
use bollard::models::HostConfig;
use crate::auth::RegistryCredentials;
use crate::errors::ScanError;
use super::engine::{ContainerEngine, ContainerSpec, ImageHandle, LogSink};
use tracing::{debug, info};

/// `ContainerEngine` backed by the local Docker daemon.
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    pub fn connect() -> Result<Self, ScanError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| ScanError::Container(format!("Failed to connect to Docker: {}", e)))?;
        Ok(Self { docker })
    }

    pub fn docker(&self) -> &Docker {
        &self.docker
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn pull_image(
        &self,
        image: &str,
        credentials: Option<RegistryCredentials>,
    ) -> Result<ImageHandle, ScanError> {
        self.pull(image, credentials).await
    }

    async fn remove_image(&self, image: &str) -> Result<(), ScanError> {
        self.remove(image).await
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, ScanError> {
        let host_config = HostConfig {
            binds: Some(spec.mounts.iter().map(|m| m.bind()).collect()),
            ..Default::default()
        };

        let config = Config {
            image: Some(spec.image.clone()),
            cmd: Some(spec.cmd.clone()),
            tty: Some(false),
            host_config: Some(host_config),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: spec.name.as_str(),
            platform: None,
        };

        let response = self.docker.create_container(Some(options), config).await
            .map_err(|e| ScanError::Container(format!("Failed to create container: {}", e)))?;

        for warning in &response.warnings {
            debug!(container = %spec.name, warning = %warning, "Docker warning");
        }
        info!(container = %spec.name, id = %response.id, "Scanner container created");
        Ok(response.id)
    }

    async fn start_container(&self, id: &str) -> Result<(), ScanError> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| ScanError::Container(format!("Failed to start container: {}", e)))?;
        Ok(())
    }

    async fn follow_logs(&self, id: &str, sink: &LogSink) -> Result<(), ScanError> {
        self.stream_logs(id, sink).await
    }

    async fn wait_container(&self, id: &str) -> Result<i64, ScanError> {
        self.wait(id).await
    }

    async fn remove_container(&self, id: &str) -> Result<(), ScanError> {
        self.docker
            .remove_container(
                id,
                Some(RemoveContainerOptions { force: true, ..Default::default() }),
            )
            .await
            .map_err(|e| ScanError::Container(format!("Failed to remove container: {}", e)))?;
        debug!(id = %id, "Scanner container removed");
        Ok(())
    }
}
