use super::types::ScanError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
    /// Failure belongs to a single image's scan; a batch moves on to the next image.
    pub scan_failure: bool,
}

impl ScanError {
    /// Classify this error to determine its type, whether it can be retried,
    /// and whether it is isolated to one image's scan.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Fatal for the whole run
            ScanError::Config(_) => ErrorClassification {
                error_type: "ConfigurationError",
                retryable: false,
                scan_failure: false,
            },
            ScanError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                retryable: false,
                scan_failure: false,
            },
            ScanError::Yaml(_) => ErrorClassification {
                error_type: "ConfigurationError",
                retryable: false,
                scan_failure: false,
            },

            // Per-image scan failures
            ScanError::Container(_) => ErrorClassification {
                error_type: "ContainerError",
                retryable: true,
                scan_failure: true,
            },
            ScanError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: false,
                scan_failure: true,
            },
            ScanError::OutputMissing(_) | ScanError::StaleOutput(_) => ErrorClassification {
                error_type: "OutputMissingError",
                retryable: false,
                scan_failure: true,
            },
            ScanError::Parse(_) => ErrorClassification {
                error_type: "ParseError",
                retryable: false,
                scan_failure: true,
            },
            ScanError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: false,
                scan_failure: true,
            },

            ScanError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
                scan_failure: false,
            },
        }
    }

    /// True for errors that abort a multi-image run instead of being
    /// reported against a single image.
    pub fn is_fatal(&self) -> bool {
        !self.classify().scan_failure
    }

    /// Process exit code when this error ends the program.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::Config(_) | ScanError::Yaml(_) => 2,
            ScanError::Container(_) => 3,
            ScanError::Authentication(_) => 4,
            _ => 1,
        }
    }
}
