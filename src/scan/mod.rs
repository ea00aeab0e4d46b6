pub mod command;
pub mod ignore;
pub mod orchestrator;
pub mod outcome;

pub use ignore::ensure_ignore_file;
pub use orchestrator::{read_result, ScanOrchestrator, ScanRequest};
pub use outcome::{batch_exit_code, ImageScan, ScanOutcome};
