use std::path::Path;
use tokio::io::AsyncWriteExt;
use crate::errors::ScanError;
use tracing::{debug, info};

/// Write the scanner's ignore file unless one already exists.
///
/// Returns `true` if the file was created. An existing file is never
/// touched, so local edits survive across runs.
pub async fn ensure_ignore_file(path: &Path, ids: &[String]) -> Result<bool, ScanError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "Ignore file already present");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    file.write_all(ids.join("\n").as_bytes()).await?;
    file.flush().await?;
    info!(path = %path.display(), count = ids.len(), "Ignore file written");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_ids_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".trivyignore");
        let ids = vec!["CVE-2023-0001".to_string(), "CVE-2023-0002".to_string()];

        assert!(ensure_ignore_file(&path, &ids).await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "CVE-2023-0001\nCVE-2023-0002");
    }

    #[tokio::test]
    async fn test_second_call_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".trivyignore");

        assert!(ensure_ignore_file(&path, &["CVE-1".to_string()]).await.unwrap());
        assert!(!ensure_ignore_file(&path, &["CVE-2".to_string()]).await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "CVE-1");
    }

    #[tokio::test]
    async fn test_existing_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".trivyignore");
        std::fs::write(&path, "# hand edited\nCVE-9").unwrap();

        assert!(!ensure_ignore_file(&path, &[]).await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hand edited\nCVE-9");
    }

    #[tokio::test]
    async fn test_empty_list_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(".trivyignore");
        assert!(ensure_ignore_file(&path, &[]).await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
