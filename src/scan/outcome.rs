use crate::errors::ScanError;
use crate::models::ScanResult;

/// What happened to one image. The scanner's exit code plays no part here:
/// findings are decided from the parsed output alone.
#[derive(Debug)]
pub enum ScanOutcome {
    FindingsPresent(ScanResult),
    Clean(ScanResult),
    OrchestrationFailed(ScanError),
    /// Skipped because an earlier image hit an error that ends the run.
    NotAttempted,
}

impl ScanOutcome {
    pub fn from_result(result: ScanResult) -> Self {
        if result.has_vulnerabilities() {
            Self::FindingsPresent(result)
        } else {
            Self::Clean(result)
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::OrchestrationFailed(_) | Self::NotAttempted)
    }

    pub fn error(&self) -> Option<&ScanError> {
        match self {
            Self::OrchestrationFailed(e) => Some(e),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ScanResult> {
        match self {
            Self::FindingsPresent(r) | Self::Clean(r) => Some(r),
            Self::OrchestrationFailed(_) | Self::NotAttempted => None,
        }
    }
}

impl From<Result<ScanResult, ScanError>> for ScanOutcome {
    fn from(result: Result<ScanResult, ScanError>) -> Self {
        match result {
            Ok(r) => Self::from_result(r),
            Err(e) => Self::OrchestrationFailed(e),
        }
    }
}

/// Outcome paired with the image it belongs to.
#[derive(Debug)]
pub struct ImageScan {
    pub image: String,
    pub outcome: ScanOutcome,
}

/// Process exit code for a finished batch: 0 when every image was scanned,
/// the aborting error's own code when a fatal error ended the run early,
/// otherwise 1.
pub fn batch_exit_code(scans: &[ImageScan]) -> i32 {
    if let Some(fatal) = scans
        .iter()
        .filter_map(|s| s.outcome.error())
        .find(|e| e.is_fatal())
    {
        return fatal.exit_code();
    }
    if scans.iter().any(|s| s.outcome.is_failure()) {
        1
    } else {
        0
    }
}
