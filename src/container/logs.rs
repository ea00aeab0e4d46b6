use bollard::container::{LogsOptions, WaitContainerOptions};
use futures::StreamExt;
use crate::errors::ScanError;
use super::docker::DockerEngine;
use super::engine::LogSink;
use tracing::debug;

/// Reassembles log chunks into whole lines. Docker frames do not have to
/// end on a newline.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub fn push(&mut self, chunk: &str, sink: &LogSink) {
        self.pending.push_str(chunk);
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            sink(line.trim_end_matches(['\n', '\r']));
        }
    }

    pub fn flush(&mut self, sink: &LogSink) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            sink(line.trim_end_matches('\r'));
        }
    }
}

impl DockerEngine {
    pub(super) async fn stream_logs(&self, id: &str, sink: &LogSink) -> Result<(), ScanError> {
        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            ..Default::default()
        };

        let mut stream = self.docker().logs(id, Some(options));
        let mut lines = LineBuffer::default();
        while let Some(msg) = stream.next().await {
            match msg {
                Ok(chunk) => lines.push(&chunk.to_string(), sink),
                Err(e) => {
                    lines.flush(sink);
                    return Err(ScanError::Container(format!("Log stream failed: {}", e)));
                }
            }
        }
        lines.flush(sink);
        Ok(())
    }

    pub(super) async fn wait(&self, id: &str) -> Result<i64, ScanError> {
        let options = WaitContainerOptions { condition: "not-running" };
        let mut stream = self.docker().wait_container(id, Some(options));

        match stream.next().await {
            Some(Ok(response)) => Ok(response.status_code),
            // bollard reports a non-zero exit as an error; for the scanner
            // that is the "vulnerabilities found" signal
            Some(Err(bollard::errors::Error::DockerContainerWaitError { code, error })) => {
                debug!(id = %id, code, error = %error, "Container exited non-zero");
                Ok(code)
            }
            Some(Err(e)) => Err(ScanError::Container(format!("Failed to wait for container: {}", e))),
            None => Err(ScanError::Container("Wait stream ended without a status".into())),
        }
    }
}
