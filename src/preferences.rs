//! Persisted user preferences, stored as a small TOML file next to the
//! catalog database.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::observe::{ChangeNotifier, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_notifications")]
    pub notifications_enabled: bool,
}

fn default_notifications() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications_enabled: default_notifications(),
        }
    }
}

/// File-backed preference store. Clones share the cached values and the
/// observer list; every write goes to disk before observers are woken.
#[derive(Clone)]
pub struct PreferencesStore {
    path: PathBuf,
    current: Arc<Mutex<Preferences>>,
    changes: ChangeNotifier,
}

impl PreferencesStore {
    /// Load preferences from `path`. A missing file means defaults; a file
    /// that fails to parse is logged and replaced by defaults on next write.
    pub fn open(path: &Path) -> Result<Self> {
        let current = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<Preferences>(&contents).unwrap_or_else(|err| {
                warn!("ignoring malformed preferences at {}: {err}", path.display());
                Preferences::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", path.display()));
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            current: Arc::new(Mutex::new(current)),
            changes: ChangeNotifier::new(),
        })
    }

    pub fn current(&self) -> Result<Preferences> {
        self.current
            .lock()
            .map(|prefs| *prefs)
            .map_err(|_| anyhow!("preferences lock poisoned"))
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.update(|prefs| prefs.dark_mode = enabled)?;
        info!("dark mode set to {enabled}");
        Ok(())
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|prefs| prefs.notifications_enabled = enabled)?;
        info!("notifications set to {enabled}");
        Ok(())
    }

    /// Current preferences, re-emitted after each write.
    pub fn observe(&self) -> Subscription<Preferences> {
        let store = self.clone();
        Subscription::new(self.changes.watch(), move || store.current())
    }

    /// Apply `edit`, persist the result, and only then publish it. The lock
    /// is held across the write so concurrent edits are serialized.
    fn update(&self, edit: impl FnOnce(&mut Preferences)) -> Result<()> {
        {
            let mut current = self
                .current
                .lock()
                .map_err(|_| anyhow!("preferences lock poisoned"))?;
            let mut next = *current;
            edit(&mut next);
            write_file(&self.path, &next)?;
            *current = next;
        }
        self.changes.notify();
        Ok(())
    }
}

fn write_file(path: &Path, prefs: &Preferences) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create preferences directory")?;
    }
    let contents = toml::to_string_pretty(prefs).context("failed to encode preferences")?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
