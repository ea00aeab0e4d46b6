use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCANNER_IMAGE: &str = "aquasec/trivy:latest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";
pub const DEFAULT_SEVERITIES: &[&str] = &["HIGH", "CRITICAL"];

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScanConfig {
    /// Vulnerability IDs written to the scanner's ignore file.
    pub ignore_cves: Option<Vec<String>>,
    /// Private registry that needs credentials before pulling.
    #[serde(alias = "registry_domain")]
    pub registory_domain: Option<String>,
    pub scanner: Option<ScannerConfig>,
    pub retry: Option<RetrySettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScannerConfig {
    pub image: Option<String>,
    pub timeout_secs: Option<u64>,
    pub severities: Option<Vec<String>>,
    pub docker_socket: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RetrySettings {
    pub max_retries: Option<u32>,
}

impl ScanConfig {
    pub fn ignore_cves(&self) -> &[String] {
        self.ignore_cves.as_deref().unwrap_or(&[])
    }

    pub fn registry_domain(&self) -> Option<&str> {
        self.registory_domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn scanner_image(&self) -> String {
        self.scanner
            .as_ref()
            .and_then(|s| s.image.clone())
            .unwrap_or_else(|| DEFAULT_SCANNER_IMAGE.to_string())
    }

    pub fn timeout(&self) -> Duration {
        let secs = self.scanner
            .as_ref()
            .and_then(|s| s.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn severities(&self) -> Vec<String> {
        self.scanner
            .as_ref()
            .and_then(|s| s.severities.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEVERITIES.iter().map(|s| s.to_string()).collect())
    }

    pub fn docker_socket(&self) -> String {
        self.scanner
            .as_ref()
            .and_then(|s| s.docker_socket.clone())
            .unwrap_or_else(|| DEFAULT_DOCKER_SOCKET.to_string())
    }

    pub fn max_retries(&self) -> u32 {
        self.retry.as_ref().and_then(|r| r.max_retries).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert!(config.ignore_cves().is_empty());
        assert!(config.registry_domain().is_none());
        assert_eq!(config.scanner_image(), "aquasec/trivy:latest");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.severities(), vec!["HIGH", "CRITICAL"]);
        assert_eq!(config.docker_socket(), "/var/run/docker.sock");
        assert_eq!(config.max_retries(), 0);
    }

    #[test]
    fn test_original_key_spelling() {
        let config: ScanConfig = serde_yaml::from_str(
            "ignore_cves:\n  - CVE-2023-0001\n  - CVE-2023-0002\nregistory_domain: ghcr.io\n",
        ).unwrap();
        assert_eq!(config.ignore_cves(), ["CVE-2023-0001", "CVE-2023-0002"]);
        assert_eq!(config.registry_domain(), Some("ghcr.io"));
    }

    #[test]
    fn test_registry_domain_alias() {
        let config: ScanConfig = serde_yaml::from_str("registry_domain: ghcr.io\n").unwrap();
        assert_eq!(config.registry_domain(), Some("ghcr.io"));
    }

    #[test]
    fn test_blank_registry_domain_ignored() {
        let config: ScanConfig = serde_yaml::from_str("registory_domain: '  '\n").unwrap();
        assert!(config.registry_domain().is_none());
    }

    #[test]
    fn test_null_ignore_list() {
        let config: ScanConfig = serde_yaml::from_str("ignore_cves:\n").unwrap();
        assert!(config.ignore_cves().is_empty());
    }

    #[test]
    fn test_scanner_overrides() {
        let config: ScanConfig = serde_yaml::from_str(
            "scanner:\n  image: aquasec/trivy:0.50.0\n  timeout_secs: 300\n  severities: [CRITICAL]\nretry:\n  max_retries: 2\n",
        ).unwrap();
        assert_eq!(config.scanner_image(), "aquasec/trivy:0.50.0");
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert_eq!(config.severities(), vec!["CRITICAL"]);
        assert_eq!(config.max_retries(), 2);
    }
}
