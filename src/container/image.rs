use bollard::auth::DockerCredentials;
use bollard::image::{CreateImageOptions, RemoveImageOptions};
use futures::StreamExt;
use crate::auth::RegistryCredentials;
use crate::errors::ScanError;
use super::docker::DockerEngine;
use super::engine::ImageHandle;
use tracing::{debug, info};

/// Split an image reference into the `fromImage` / `tag` pair the pull API
/// expects. An empty tag would pull every tag of the repository, so
/// untagged references default to `latest`. Digests stay in `fromImage`.
pub fn split_reference(image: &str) -> (&str, &str) {
    if image.contains('@') {
        return (image, "");
    }
    let name_start = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[name_start..].rfind(':') {
        Some(i) => (&image[..name_start + i], &image[name_start + i + 1..]),
        None => (image, "latest"),
    }
}

impl From<RegistryCredentials> for DockerCredentials {
    fn from(creds: RegistryCredentials) -> Self {
        DockerCredentials {
            username: Some(creds.username),
            password: Some(creds.password),
            serveraddress: Some(creds.server_address),
            ..Default::default()
        }
    }
}

fn map_pull_error(image: &str, err: bollard::errors::Error) -> ScanError {
    match err {
        bollard::errors::Error::DockerResponseServerError { status_code: 401 | 403, message } => {
            ScanError::Authentication(format!("Registry rejected pull of {}: {}", image, message))
        }
        other => ScanError::Container(format!("Failed to pull {}: {}", image, other)),
    }
}

impl DockerEngine {
    pub(super) async fn pull(
        &self,
        image: &str,
        credentials: Option<RegistryCredentials>,
    ) -> Result<ImageHandle, ScanError> {
        let (from_image, tag) = split_reference(image);
        info!(image = %image, "Pulling image");

        let options = CreateImageOptions {
            from_image,
            tag,
            ..Default::default()
        };

        let mut stream = self.docker().create_image(
            Some(options),
            None,
            credentials.map(DockerCredentials::from),
        );
        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => {
                    if let Some(error) = info.error {
                        return Err(ScanError::Container(format!("Failed to pull {}: {}", image, error)));
                    }
                    if let Some(status) = info.status {
                        debug!(image = %image, status = %status, "Pull progress");
                    }
                }
                Err(e) => return Err(map_pull_error(image, e)),
            }
        }

        let id = match self.docker().inspect_image(image).await {
            Ok(inspect) => inspect.id,
            Err(e) => {
                debug!(image = %image, error = %e, "Pulled image could not be inspected");
                None
            }
        };

        Ok(ImageHandle { reference: image.to_string(), id })
    }

    pub(super) async fn remove(&self, image: &str) -> Result<(), ScanError> {
        self.docker()
            .remove_image(
                image,
                Some(RemoveImageOptions { force: true, ..Default::default() }),
                None,
            )
            .await
            .map_err(|e| ScanError::Container(format!("Failed to remove image {}: {}", image, e)))?;
        info!(image = %image, "Image removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tagged() {
        assert_eq!(split_reference("nginx:1.25"), ("nginx", "1.25"));
        assert_eq!(split_reference("ghcr.io/acme/api:v2"), ("ghcr.io/acme/api", "v2"));
    }

    #[test]
    fn test_split_untagged_defaults_latest() {
        assert_eq!(split_reference("nginx"), ("nginx", "latest"));
        assert_eq!(split_reference("localhost:5000/api"), ("localhost:5000/api", "latest"));
    }

    #[test]
    fn test_split_registry_port_with_tag() {
        assert_eq!(split_reference("localhost:5000/api:1.0"), ("localhost:5000/api", "1.0"));
    }

    #[test]
    fn test_split_digest() {
        let image = "alpine@sha256:0123abcd";
        assert_eq!(split_reference(image), (image, ""));
    }

    #[test]
    fn test_credentials_conversion() {
        let creds = DockerCredentials::from(RegistryCredentials {
            username: "octocat".into(),
            password: "ghp_x".into(),
            server_address: "https://ghcr.io".into(),
        });
        assert_eq!(creds.username.as_deref(), Some("octocat"));
        assert_eq!(creds.serveraddress.as_deref(), Some("https://ghcr.io"));
    }
}
