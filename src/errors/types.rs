use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Container error: {0}")]
    Container(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Scan output missing: {0}")]
    OutputMissing(String),

    #[error("Stale scan output: {0}")]
    StaleOutput(String),

    #[error("Scan output is not valid JSON: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
