use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::commands::ScanArgs;
use crate::config::{parse_config, ScanPaths};
use crate::container::{ContainerEngine, DockerEngine, LogSink};
use crate::errors::ScanError;
use crate::reporting::ReportAssembler;
use crate::scan::{batch_exit_code, ScanOrchestrator, ScanRequest};
use tracing::info;

/// Run the batch and return the process exit code. Errors are reserved for
/// problems before any image is scanned or while writing reports.
pub async fn handle_scan(args: ScanArgs, quiet: bool) -> Result<i32, ScanError> {
    let config = Arc::new(parse_config(Path::new(&args.config)).await?);
    let paths = ScanPaths::resolve()?;
    info!(base = %paths.base().display(), images = args.images.len(), "Preparing scans");

    let engine: Arc<dyn ContainerEngine> = Arc::new(DockerEngine::connect()?);
    let sink: LogSink = if quiet {
        Arc::new(|_: &str| {})
    } else {
        Arc::new(|line: &str| eprintln!("{}", line))
    };

    let mut orchestrator = ScanOrchestrator::new(engine, config, paths).with_log_sink(sink);
    if let Some(secs) = args.timeout {
        orchestrator = orchestrator.with_timeout(Duration::from_secs(secs));
    }

    let requests: Vec<ScanRequest> = args.images
        .iter()
        .map(|image| ScanRequest::new(image.as_str(), args.remove_image))
        .collect();
    let scans = orchestrator.scan_all(&requests).await;

    let mut assembler = ReportAssembler::new();
    for scan in &scans {
        if let Some(fragment) = assembler.record(scan) {
            println!("{}", fragment);
        }
    }
    println!("{}", assembler.summary_text());

    if let Some(path) = &args.issue_out {
        assembler.write_issue(Path::new(path)).await?;
    }
    if let Some(path) = &args.summary_out {
        assembler.write_summary(Path::new(path)).await?;
    }

    info!(
        scanned = scans.len(),
        vulnerable = assembler.fragments().len(),
        clean = assembler.clean_images().len(),
        failed = assembler.failures().len(),
        "Scan run finished"
    );

    Ok(batch_exit_code(&scans))
}
