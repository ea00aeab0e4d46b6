use dashmap::DashMap;
use crate::errors::ScanError;
use tracing::{debug, info};

pub const REGISTRY_USER_ENV: &str = "GITHUB_USER";
pub const REGISTRY_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Credentials attached to image pulls from a private registry.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
    pub server_address: String,
}

impl std::fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("server_address", &self.server_address)
            .finish()
    }
}

/// Resolves registry credentials at most once per domain.
pub struct RegistryAuthenticator {
    username: Option<String>,
    token: Option<String>,
    cache: DashMap<String, RegistryCredentials>,
}

impl RegistryAuthenticator {
    pub fn new(username: Option<String>, token: Option<String>) -> Self {
        Self {
            username: username.filter(|u| !u.is_empty()),
            token: token.filter(|t| !t.is_empty()),
            cache: DashMap::new(),
        }
    }

    /// Read `GITHUB_USER` / `GITHUB_TOKEN` from the environment.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(REGISTRY_USER_ENV).ok(),
            std::env::var(REGISTRY_TOKEN_ENV).ok(),
        )
    }

    pub fn authenticate(&self, domain: &str) -> Result<RegistryCredentials, ScanError> {
        if let Some(cached) = self.cache.get(domain) {
            debug!(domain = %domain, "Using cached registry credentials");
            return Ok(cached.clone());
        }

        let (username, password) = match (&self.username, &self.token) {
            (Some(u), Some(t)) => (u.clone(), t.clone()),
            _ => {
                return Err(ScanError::Authentication(format!(
                    "{} and {} must be set to pull from {}",
                    REGISTRY_USER_ENV, REGISTRY_TOKEN_ENV, domain
                )));
            }
        };

        let credentials = RegistryCredentials {
            username,
            password,
            server_address: format!("https://{}", domain),
        };
        info!(domain = %domain, user = %credentials.username, "Registry credentials prepared");
        self.cache.insert(domain.to_string(), credentials.clone());
        Ok(credentials)
    }

    /// Credentials for `image` if it lives on an already authenticated registry.
    pub fn credentials_for(&self, image: &str) -> Option<RegistryCredentials> {
        let domain = image_registry(image)?;
        self.cache.get(domain).map(|c| c.clone())
    }
}

/// Registry host of an image reference, if it names one explicitly.
pub fn image_registry(image: &str) -> Option<&str> {
    let (first, _) = image.split_once('/')?;
    if first.contains('.') || first.contains(':') || first == "localhost" {
        Some(first)
    } else {
        None
    }
}
