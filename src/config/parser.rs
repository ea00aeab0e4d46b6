use std::collections::HashSet;
use std::path::Path;
use crate::errors::ScanError;
use super::types::ScanConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

pub async fn parse_config(path: &Path) -> Result<ScanConfig, ScanError> {
    if !path.exists() {
        return Err(ScanError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await
        .map_err(|e| ScanError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    if metadata.len() > 1_048_576 {
        return Err(ScanError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| ScanError::Config(format!("Cannot read {}: {}", path.display(), e)))?;

    let config = parse_config_str(&content)?;
    debug!(
        path = %path.display(),
        ignored = config.ignore_cves().len(),
        registry = config.registry_domain().unwrap_or("-"),
        "Configuration loaded"
    );
    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<ScanConfig, ScanError> {
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    // An empty document means "all defaults"
    if yaml.is_null() {
        yaml = serde_yaml::Value::Mapping(Default::default());
    }

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: ScanConfig = serde_yaml::from_value(yaml)?;

    validate_ignore_list(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ScanError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| ScanError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ScanError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; typed parsing below is the hard gate
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_ignore_list(config: &ScanConfig) -> Result<(), ScanError> {
    let mut seen = HashSet::new();
    for (i, id) in config.ignore_cves().iter().enumerate() {
        if id.trim().is_empty() {
            return Err(ScanError::Config(format!("ignore_cves[{}] is empty", i)));
        }
        if id.contains('\n') {
            return Err(ScanError::Config(format!("ignore_cves[{}] spans multiple lines", i)));
        }
        if !seen.insert(id.as_str()) {
            warn!(id = %id, "Duplicate entry in ignore_cves");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_config(&dir.path().join("config.yml")).await.unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[tokio::test]
    async fn test_parse_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ignore_cves:\n  - CVE-2022-1111\nregistory_domain: ghcr.io").unwrap();
        let config = parse_config(file.path()).await.unwrap();
        assert_eq!(config.ignore_cves(), ["CVE-2022-1111"]);
        assert_eq!(config.registry_domain(), Some("ghcr.io"));
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = parse_config_str("").unwrap();
        assert!(config.ignore_cves().is_empty());
        assert!(config.registry_domain().is_none());
    }

    #[test]
    fn test_blank_ignore_entry_rejected() {
        let err = parse_config_str("ignore_cves:\n  - ''\n").unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn test_wrong_type_is_yaml_error() {
        let err = parse_config_str("ignore_cves: 42\n").unwrap_err();
        assert!(matches!(err, ScanError::Yaml(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let config = parse_config_str("ignore_cves: [CVE-1, CVE-1]\n").unwrap();
        assert_eq!(config.ignore_cves().len(), 2);
    }
}
