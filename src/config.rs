use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Overrides the data directory, mostly for tests and demos.
pub const HOME_ENV_VAR: &str = "ANDROID_ONE_HOME";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".android-one";
const DB_FILE_NAME: &str = "catalog.sqlite";
const PREFS_FILE_NAME: &str = "preferences.toml";
const LOG_FILE_NAME: &str = "android-one.log";

/// Locations of every file the application owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub preferences: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    /// Resolve from `ANDROID_ONE_HOME`, falling back to `~/.android-one`.
    pub fn resolve() -> Result<Self> {
        if let Some(dir) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
            return Ok(Self::in_dir(Path::new(&dir)));
        }
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(&base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            database: dir.join(DB_FILE_NAME),
            preferences: dir.join(PREFS_FILE_NAME),
            log_file: dir.join(LOG_FILE_NAME),
        }
    }
}
