use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

const PATH_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Locate the Chrome/Chromium binary to drive.
///
/// An explicit override must point at an executable. Otherwise the first
/// usable candidate wins: PATH lookups first, then the platform's usual
/// install locations.
pub fn find_chrome(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if !is_executable(path) {
            return Err(Error::ChromeNotFound(format!(
                "{} is missing or not executable",
                path.display()
            )));
        }
        return Ok(path.to_path_buf());
    }

    candidates()
        .into_iter()
        .find(|path| is_executable(path))
        .ok_or_else(|| {
            Error::ChromeNotFound(
                "no Chrome or Chromium on PATH or in the usual install locations; \
                 use --chrome-path to point at a binary"
                    .to_string(),
            )
        })
}

/// Candidate binaries in resolution order.
fn candidates() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = PATH_NAMES
        .iter()
        .filter_map(|name| which::which(name).ok())
        .collect();

    let install_locations: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[
            "/opt/google/chrome/chrome",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    };
    paths.extend(install_locations.iter().map(PathBuf::from));

    paths
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// How to start the browser for a run.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub window_size: (u32, u32),
    pub debugging_port: u16,
    pub profile_dir: PathBuf,
}

impl LaunchOptions {
    pub fn new(profile_dir: PathBuf) -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            debugging_port: 9222,
            profile_dir,
        }
    }
}

/// A spawned Chrome process and its debugging port.
#[derive(Debug)]
pub struct ChromeProcess {
    child: Child,
    debugging_port: u16,
}

impl ChromeProcess {
    /// Launch Chrome with the remote-debugging port open.
    pub fn launch(binary: &Path, options: &LaunchOptions) -> Result<Self> {
        let args = build_args(options);
        tracing::debug!("launching {} {}", binary.display(), args.join(" "));

        let child = Command::new(binary)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Launch(format!("{}: {}", binary.display(), e)))?;

        Ok(Self {
            child,
            debugging_port: options.debugging_port,
        })
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Terminate the browser process. Errors are swallowed: the process may
    /// already have exited.
    pub fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn build_args(options: &LaunchOptions) -> Vec<String> {
    let mut args = vec![
        format!("--remote-debugging-port={}", options.debugging_port),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        format!("--user-data-dir={}", options.profile_dir.display()),
    ];

    if options.headless {
        args.push("--headless=new".to_string());
        args.push(format!(
            "--window-size={},{}",
            options.window_size.0, options.window_size.1
        ));
    }

    args.push("about:blank".to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> LaunchOptions {
        LaunchOptions::new(PathBuf::from("/tmp/profile"))
    }

    #[test]
    fn test_build_args_headless_defaults() {
        let args = build_args(&options());

        assert!(args.contains(&"--remote-debugging-port=9222".to_string()));
        assert!(args.contains(&"--no-first-run".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-dev-shm-usage".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--user-data-dir=")));
        assert!(args.contains(&"about:blank".to_string()));
    }

    #[test]
    fn test_build_args_headed_omits_headless_flags() {
        let mut opts = options();
        opts.headless = false;
        let args = build_args(&opts);

        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert!(!args.iter().any(|a| a.starts_with("--window-size")));
    }

    #[test]
    fn test_build_args_opens_blank_page() {
        let args = build_args(&options());
        assert_eq!(args.last(), Some(&"about:blank".to_string()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_candidates_end_with_install_locations() {
        let candidates = candidates();
        // PATH hits, if any, come before the install locations.
        assert!(candidates.contains(&PathBuf::from("/usr/bin/google-chrome")));
        assert_eq!(candidates.last(), Some(&PathBuf::from("/snap/bin/chromium")));
    }

    #[test]
    fn test_find_chrome_accepts_executable_override() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let found = find_chrome(Some(path)).unwrap();
        assert_eq!(found, path);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_chrome_rejects_non_executable_override() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = find_chrome(Some(temp.path()));
        assert!(matches!(result, Err(Error::ChromeNotFound(_))));
    }

    #[test]
    fn test_find_chrome_rejects_missing_override() {
        let result = find_chrome(Some(Path::new("/nonexistent/chrome")));
        assert!(matches!(result, Err(Error::ChromeNotFound(_))));
    }
}
