use std::env;
use std::path::{Path, PathBuf};

/// Directory name used under the user's config base.
const APP_DIR: &str = "lanprefill";

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// What: Decide which directory holds settings, logs and state.
///
/// Inputs:
/// - `override_dir`: Value of `--config-dir`, if given
///
/// Output:
/// - The override when present; otherwise `$HOME/.config/lanprefill`, falling
///   back to `$XDG_CONFIG_HOME/lanprefill`.
///
/// Details:
/// - Does not create anything; see [`Paths::ensure`].
pub fn resolve_config_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Ok(home) = env::var("HOME")
        && !home.trim().is_empty()
    {
        return Path::new(&home).join(".config").join(APP_DIR);
    }
    xdg_base_dir("XDG_CONFIG_HOME", &[".config"]).join(APP_DIR)
}

/// Resolved file layout rooted at the config directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// What: Create the root, `logs/` and `state/` directories if missing.
    ///
    /// Output:
    /// - `Err` only when a directory cannot be created.
    ///
    /// # Errors
    /// - Propagates the `std::io::Error` from `create_dir_all`.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.logs_dir())?;
        std::fs::create_dir_all(self.state_dir())?;
        Ok(())
    }

    /// Config root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `settings.conf` location.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.conf")
    }

    /// Log directory.
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Directory for durable run state.
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    /// Persisted selection file.
    #[must_use]
    pub fn selection_file(&self) -> PathBuf {
        self.state_dir().join("selected_apps.json")
    }

    /// Freshness store file.
    #[must_use]
    pub fn freshness_file(&self) -> PathBuf {
        self.state_dir().join("downloaded_versions.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: An explicit override wins over the environment.
    fn override_dir_is_used_verbatim() {
        let dir = resolve_config_dir(Some(Path::new("/tmp/custom")));
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
    }

    #[test]
    /// What: `ensure` creates the log and state folders under the root.
    ///
    /// Inputs:
    /// - Fresh temporary root
    ///
    /// Output:
    /// - `logs/` and `state/` exist; file paths sit under `state/`.
    fn ensure_creates_layout() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let paths = Paths::new(tmp.path().join("cfg"));
        paths.ensure().expect("ensure layout");
        assert!(paths.logs_dir().is_dir());
        assert!(paths.state_dir().is_dir());
        assert!(paths.selection_file().starts_with(paths.state_dir()));
        assert!(paths.freshness_file().starts_with(paths.state_dir()));
        assert!(paths.settings_file().ends_with("settings.conf"));
    }
}
