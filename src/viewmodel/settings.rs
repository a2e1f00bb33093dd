use log::warn;

use crate::observe::Subscription;
use crate::preferences::{Preferences, PreferencesStore};
use crate::repository::ContentRepository;

use super::error_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    pub dark_mode: bool,
    pub notifications_enabled: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Rows re-seeded by the last catalog reset, for the footer message.
    pub last_reset: Option<usize>,
}

impl Default for SettingsState {
    fn default() -> Self {
        let defaults = Preferences::default();
        Self {
            dark_mode: defaults.dark_mode,
            notifications_enabled: defaults.notifications_enabled,
            is_loading: false,
            error: None,
            last_reset: None,
        }
    }
}

pub struct SettingsViewModel {
    store: PreferencesStore,
    repository: ContentRepository,
    preferences: Subscription<Preferences>,
    state: SettingsState,
}

impl SettingsViewModel {
    pub fn new(store: PreferencesStore, repository: ContentRepository) -> Self {
        let preferences = store.observe();
        Self {
            store,
            repository,
            preferences,
            state: SettingsState {
                is_loading: true,
                ..SettingsState::default()
            },
        }
    }

    pub fn state(&self) -> &SettingsState {
        &self.state
    }

    /// Flip dark mode relative to the last value this screen saw. Two toggles
    /// issued before a `sync` both read the same value.
    pub fn toggle_dark_mode(&mut self) {
        let result = self.store.set_dark_mode(!self.state.dark_mode);
        self.record(result);
    }

    pub fn toggle_notifications(&mut self) {
        let result = self
            .store
            .set_notifications_enabled(!self.state.notifications_enabled);
        self.record(result);
    }

    /// Wipe the catalog and run the first-launch seed again.
    pub fn reset_catalog(&mut self) {
        let result = self
            .repository
            .clear()
            .and_then(|_| self.repository.refresh());
        match result {
            Ok(seeded) => {
                self.state = SettingsState {
                    last_reset: Some(seeded),
                    error: None,
                    ..self.state.clone()
                };
            }
            Err(err) => self.record(Err(err)),
        }
    }

    pub fn sync(&mut self) -> bool {
        let Some(update) = self.preferences.next_update() else {
            return false;
        };

        let before = self.state.clone();
        self.state = match update {
            Ok(prefs) => SettingsState {
                dark_mode: prefs.dark_mode,
                notifications_enabled: prefs.notifications_enabled,
                is_loading: false,
                ..self.state.clone()
            },
            Err(err) => SettingsState {
                is_loading: false,
                error: Some(error_message(&err)),
                ..self.state.clone()
            },
        };
        self.state != before
    }

    fn record(&mut self, result: anyhow::Result<()>) {
        if let Err(err) = result {
            warn!("settings update failed: {err:#}");
            self.state = SettingsState {
                error: Some(error_message(&err)),
                ..self.state.clone()
            };
        }
    }
}
