use std::path::{Path, PathBuf};
use crate::errors::ScanError;

/// Environment variable naming the base directory shared with the scanner.
pub const VOLUME_PATH_ENV: &str = "VOLUME_PATH";

pub const IGNORE_FILE_NAME: &str = ".trivyignore";
pub const RESULT_FILE_NAME: &str = "result.json";

/// Host-side locations bind-mounted into the scanner container.
///
/// When this tool itself runs inside a container, `VOLUME_PATH` must name the
/// host path of the shared volume so the bind mounts resolve on the daemon side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPaths {
    base: PathBuf,
}

impl ScanPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve from `VOLUME_PATH`, falling back to the current working directory.
    pub fn resolve() -> Result<Self, ScanError> {
        let volume = std::env::var(VOLUME_PATH_ENV).ok();
        Self::from_override(volume.as_deref())
    }

    /// A relative base is anchored at the current directory: the daemon
    /// treats a relative bind source as a named volume.
    pub fn from_override(base: Option<&str>) -> Result<Self, ScanError> {
        let cwd = std::env::current_dir()?;
        match base.filter(|b| !b.is_empty()) {
            Some(base) => Ok(Self::new(cwd.join(base))),
            None => Ok(Self::new(cwd)),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn ignore_file(&self) -> PathBuf {
        self.base.join(IGNORE_FILE_NAME)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.base.join("cache")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.base.join("out")
    }

    pub fn result_file(&self) -> PathBuf {
        self.out_dir().join(RESULT_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_base() {
        let paths = ScanPaths::from_override(Some("/srv/volume")).unwrap();
        assert_eq!(paths.ignore_file(), PathBuf::from("/srv/volume/.trivyignore"));
        assert_eq!(paths.cache_dir(), PathBuf::from("/srv/volume/cache"));
        assert_eq!(paths.out_dir(), PathBuf::from("/srv/volume/out"));
        assert_eq!(paths.result_file(), PathBuf::from("/srv/volume/out/result.json"));
    }

    #[test]
    fn test_unset_uses_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let paths = ScanPaths::from_override(None).unwrap();
        assert_eq!(paths.base(), cwd.as_path());
        assert_eq!(paths.ignore_file(), cwd.join(".trivyignore"));
        assert_eq!(paths.out_dir(), cwd.join("out"));
    }

    #[test]
    fn test_empty_override_uses_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let paths = ScanPaths::from_override(Some("")).unwrap();
        assert_eq!(paths.base(), cwd.as_path());
    }

    #[test]
    fn test_relative_override_anchored_at_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let paths = ScanPaths::from_override(Some("vol")).unwrap();
        assert!(paths.cache_dir().is_absolute());
        assert_eq!(paths.cache_dir(), cwd.join("vol").join("cache"));
    }

    // Only test in the crate that touches VOLUME_PATH
    #[test]
    fn test_resolve_reads_volume_path() {
        std::env::set_var(VOLUME_PATH_ENV, "/srv/shared");
        let from_env = ScanPaths::resolve().unwrap();
        std::env::remove_var(VOLUME_PATH_ENV);
        assert_eq!(from_env.result_file(), PathBuf::from("/srv/shared/out/result.json"));

        let fallback = ScanPaths::resolve().unwrap();
        assert_eq!(fallback.base(), std::env::current_dir().unwrap().as_path());
    }
}
