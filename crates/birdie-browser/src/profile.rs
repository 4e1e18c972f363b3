use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Chrome user-data directory for a run.
///
/// A run either gets a throwaway directory, wiped when the profile drops,
/// or a named directory under `~/.birdie/profiles` that keeps cookies, so
/// the member login survives between runs.
#[derive(Debug)]
pub enum Profile {
    Throwaway(PathBuf),
    Named { name: String, path: PathBuf },
}

impl Profile {
    /// Resolve the profile for a run: named and persistent when `name` is
    /// given, throwaway otherwise.
    pub fn resolve(name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => {
                let home = dirs::home_dir().ok_or_else(|| {
                    Error::Profile("could not determine home directory".to_string())
                })?;
                Self::named_in(&home.join(".birdie").join("profiles"), name)
            }
            None => Self::throwaway(),
        }
    }

    pub fn throwaway() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("birdie-profile-")
            .tempdir()
            .map_err(Error::Io)?;
        Ok(Profile::Throwaway(dir.keep()))
    }

    /// Named profile rooted at `root`, created if missing. Names become
    /// directory names, so anything that would escape the root is rejected.
    pub fn named_in(root: &Path, name: &str) -> Result<Self> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(Error::Profile(format!("invalid profile name '{}'", name)));
        }

        let path = root.join(name);
        fs::create_dir_all(&path).map_err(Error::Io)?;

        Ok(Profile::Named {
            name: name.to_string(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            Profile::Throwaway(path) => path,
            Profile::Named { path, .. } => path,
        }
    }

    /// The profile's name, for log lines; throwaway profiles have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Profile::Throwaway(_) => None,
            Profile::Named { name, .. } => Some(name),
        }
    }
}

impl Drop for Profile {
    fn drop(&mut self) {
        if let Profile::Throwaway(path) = self {
            let _ = fs::remove_dir_all(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throwaway_profile_wiped_on_drop() {
        let profile = Profile::throwaway().unwrap();
        let path = profile.path().to_path_buf();

        assert!(path.is_dir());
        assert_eq!(profile.name(), None);

        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_without_name_is_throwaway() {
        let profile = Profile::resolve(None).unwrap();
        let path = profile.path().to_path_buf();

        assert!(path.is_dir());
        assert_eq!(profile.name(), None);

        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn test_named_profile_survives_drop() {
        let root = tempfile::tempdir().unwrap();

        let profile = Profile::named_in(root.path(), "weekend-golfer").unwrap();
        let path = profile.path().to_path_buf();

        assert_eq!(profile.name(), Some("weekend-golfer"));
        assert_eq!(path, root.path().join("weekend-golfer"));
        assert!(path.is_dir());

        drop(profile);
        assert!(path.is_dir());
    }

    #[test]
    fn test_named_profile_rejects_escaping_names() {
        let root = tempfile::tempdir().unwrap();

        for bad in ["", "..", "../elsewhere", ".hidden", "a/b", r"a\b"] {
            let result = Profile::named_in(root.path(), bad);
            assert!(result.is_err(), "name '{}' should be rejected", bad);
        }
    }
}
