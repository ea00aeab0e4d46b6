use serde::{Deserialize, Deserializer, Serialize};

/// Finding-group class Trivy uses for distribution packages.
pub const OS_PACKAGES_CLASS: &str = "os-pkgs";

/// Parsed JSON report written by one scanner run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanResult {
    /// Image reference the scanner reports on.
    #[serde(default)]
    pub artifact_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<FindingGroup>,
}

/// One target within a scan (the OS layer, a lockfile, a binary...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FindingGroup {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub class: String,
    /// Package ecosystem, e.g. `debian`, `gobinary`, `npm`.
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vulnerability {
    #[serde(rename = "VulnerabilityID")]
    pub vulnerability_id: String,
    #[serde(default)]
    pub pkg_name: String,
    pub pkg_path: Option<String>,
    #[serde(default)]
    pub installed_version: String,
    pub fixed_version: Option<String>,
    #[serde(rename = "PrimaryURL", default)]
    pub primary_url: String,
    pub severity: Option<String>,
    pub title: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ScanResult {
    /// True if at least one finding group carries vulnerability records.
    pub fn has_vulnerabilities(&self) -> bool {
        self.results.iter().any(|g| !g.vulnerabilities.is_empty())
    }

    pub fn vulnerability_count(&self) -> usize {
        self.results.iter().map(|g| g.vulnerabilities.len()).sum()
    }
}

impl FindingGroup {
    pub fn is_os_packages(&self) -> bool {
        self.class == OS_PACKAGES_CLASS
    }

    /// Target label used in reports: OS package groups collapse to `os`
    /// since their raw target is the full image reference plus distro.
    pub fn display_target(&self) -> &str {
        if self.is_os_packages() {
            "os"
        } else {
            &self.target
        }
    }
}

impl Vulnerability {
    pub fn pkg_path_or_placeholder(&self) -> &str {
        self.pkg_path.as_deref().unwrap_or("-")
    }

    pub fn fixed_version_or_empty(&self) -> &str {
        self.fixed_version.as_deref().unwrap_or("")
    }

    /// `[ID](URL)` Markdown link.
    pub fn markdown_link(&self) -> String {
        format!("[{}]({})", self.vulnerability_id, self.primary_url)
    }
}
