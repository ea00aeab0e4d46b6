use crate::config::ScanPaths;
use crate::container::Mount;

pub const CONTAINER_CACHE_DIR: &str = "/tmp/";
pub const CONTAINER_OUT_DIR: &str = "/out/";
pub const CONTAINER_IGNORE_FILE: &str = "/ignore/.trivyignore";
pub const CONTAINER_RESULT_FILE: &str = "/out/result.json";

/// Bind mounts for one scanner container: cache, output, ignore file and
/// the engine socket so the scanner can read images from the local daemon.
pub fn scanner_mounts(paths: &ScanPaths, docker_socket: &str) -> Vec<Mount> {
    vec![
        Mount::new(paths.cache_dir().display().to_string(), CONTAINER_CACHE_DIR),
        Mount::new(paths.out_dir().display().to_string(), CONTAINER_OUT_DIR),
        Mount::new(paths.ignore_file().display().to_string(), CONTAINER_IGNORE_FILE),
        Mount::new(docker_socket, docker_socket),
    ]
}

/// Trivy argument vector. `--exit-code 1` makes the scanner exit non-zero
/// when anything is found; callers must not treat that as a failure.
pub fn scanner_command(image: &str, severities: &[String]) -> Vec<String> {
    let severities = severities.join(",");
    [
        "--cache-dir", CONTAINER_CACHE_DIR,
        "image",
        "--ignore-unfixed",
        "--no-progress",
        "-s", severities.as_str(),
        "--format", "json",
        "--exit-code", "1",
        "--ignorefile", CONTAINER_IGNORE_FILE,
        "--output", CONTAINER_RESULT_FILE,
        image,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_command() {
        let cmd = scanner_command("app:1.0", &["HIGH".into(), "CRITICAL".into()]);
        assert_eq!(cmd, vec![
            "--cache-dir", "/tmp/", "image", "--ignore-unfixed", "--no-progress",
            "-s", "HIGH,CRITICAL", "--format", "json", "--exit-code", "1",
            "--ignorefile", "/ignore/.trivyignore", "--output", "/out/result.json", "app:1.0",
        ]);
    }

    #[test]
    fn test_scanner_mounts() {
        let paths = ScanPaths::new("/srv/vol");
        let binds: Vec<String> = scanner_mounts(&paths, "/var/run/docker.sock")
            .iter()
            .map(Mount::bind)
            .collect();
        assert_eq!(binds, vec![
            "/srv/vol/cache:/tmp/",
            "/srv/vol/out:/out/",
            "/srv/vol/.trivyignore:/ignore/.trivyignore",
            "/var/run/docker.sock:/var/run/docker.sock",
        ]);
    }
}
