//! Ratatui front-end split across logical submodules.

mod app;
mod forms;
mod helpers;
mod navigation;
mod screens;
mod terminal;

use crate::preferences::PreferencesStore;
use crate::repository::{ContentRepository, SearchContent};
use crate::viewmodel::CompletionPolicy;

pub use app::App;
pub use navigation::{Navigator, Route};
pub use terminal::run_app;

/// Shared handles every screen draws its state holder from.
#[derive(Clone)]
pub struct Services {
    pub(crate) repository: ContentRepository,
    pub(crate) search: SearchContent,
    pub(crate) preferences: PreferencesStore,
    pub(crate) completion: CompletionPolicy,
}

impl Services {
    pub fn new(
        repository: ContentRepository,
        preferences: PreferencesStore,
        completion: CompletionPolicy,
    ) -> Self {
        Self {
            search: SearchContent::new(repository.clone()),
            repository,
            preferences,
            completion,
        }
    }
}
