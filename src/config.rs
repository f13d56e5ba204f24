//! Filesystem locations used by the reader and the prep commands.
//!
//! Everything lives under one hidden directory in the user's home, the same
//! way the preferences database always has. Command-line flags can override
//! each path individually.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

/// Folder under the home directory that holds all reader state.
pub const DATA_DIR: &str = ".noble-quran";
/// Merged content file produced by `fetch`.
pub const CONTENT_FILE: &str = "quran_full.json";
/// SQLite file for theme, font size, bookmarks, and last position.
pub const PREFERENCES_FILE: &str = "preferences.sqlite";
/// Log file used by the interactive reader (the terminal is in raw mode).
pub const LOG_FILE: &str = "reader.log";

/// Resolved paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub content: PathBuf,
    pub preferences: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    /// Defaults rooted at `~/.noble-quran`.
    pub fn discover() -> Result<Self> {
        let base = BaseDirs::new().context("unable to determine the home directory")?;
        Ok(Self::rooted_at(base.home_dir().join(DATA_DIR)))
    }

    pub fn rooted_at(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            content: data_dir.join(CONTENT_FILE),
            preferences: data_dir.join(PREFERENCES_FILE),
            log_file: data_dir.join(LOG_FILE),
            data_dir,
        }
    }

    /// Apply explicit overrides from the command line.
    pub fn with_overrides(
        mut self,
        content: Option<&Path>,
        preferences: Option<&Path>,
        log_file: Option<&Path>,
    ) -> Self {
        if let Some(path) = content {
            self.content = path.to_path_buf();
        }
        if let Some(path) = preferences {
            self.preferences = path.to_path_buf();
        }
        if let Some(path) = log_file {
            self.log_file = path.to_path_buf();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_paths() {
        let paths = AppPaths::rooted_at("/data").with_overrides(
            Some(Path::new("/tmp/q.json")),
            None,
            None,
        );
        assert_eq!(paths.content, PathBuf::from("/tmp/q.json"));
        assert_eq!(paths.preferences, PathBuf::from("/data/preferences.sqlite"));
        assert_eq!(paths.log_file, PathBuf::from("/data/reader.log"));
    }
}
