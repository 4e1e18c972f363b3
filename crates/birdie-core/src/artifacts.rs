use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem layout of one run's output.
///
/// ```text
/// <base>/run_<stamp>/
///     screenshots/
///     logs/
///     summary.json
/// ```
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub screenshots: PathBuf,
    pub logs: PathBuf,
}

impl RunPaths {
    /// Create the run directory tree under `base`. `stamp` is the run's
    /// timestamp in the booking timezone, formatted `%Y%m%d_%H%M%S`.
    pub fn create(base: &Path, stamp: &str) -> Result<Self> {
        let root = base.join(format!("run_{}", stamp));
        let screenshots = root.join("screenshots");
        let logs = root.join("logs");

        fs::create_dir_all(&screenshots)?;
        fs::create_dir_all(&logs)?;

        Ok(Self {
            root,
            screenshots,
            logs,
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs.join("booking.log")
    }
}

/// End-of-run record written next to the logs and screenshots.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub mode: String,
    pub target_date: String,
    pub outcome: String,
    pub attempts: u32,
    pub booked_time: Option<String>,
    pub finished_at: String,
}

impl RunSummary {
    pub fn write(&self, paths: &RunPaths) -> Result<PathBuf> {
        let path = paths.root.join("summary.json");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_builds_run_tree() {
        let base = tempfile::tempdir().unwrap();
        let paths = RunPaths::create(base.path(), "20260804_065500").unwrap();

        assert!(paths.root.ends_with("run_20260804_065500"));
        assert!(paths.screenshots.is_dir());
        assert!(paths.logs.is_dir());
        assert_eq!(paths.log_file(), paths.logs.join("booking.log"));
    }

    #[test]
    fn test_create_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        RunPaths::create(base.path(), "20260804_065500").unwrap();
        assert!(RunPaths::create(base.path(), "20260804_065500").is_ok());
    }

    #[test]
    fn test_summary_writes_json() {
        let base = tempfile::tempdir().unwrap();
        let paths = RunPaths::create(base.path(), "20260804_065500").unwrap();

        let summary = RunSummary {
            mode: "scheduled".into(),
            target_date: "2026-08-11".into(),
            outcome: "booked".into(),
            attempts: 3,
            booked_time: Some("09:10".into()),
            finished_at: "2026-08-04T07:00:12-07:00".into(),
        };

        let path = summary.write(&paths).unwrap();
        let body = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["outcome"], "booked");
        assert_eq!(value["attempts"], 3);
        assert_eq!(value["booked_time"], "09:10");
    }
}
