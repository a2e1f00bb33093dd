use crate::models::ContentItem;
use crate::viewmodel::{
    DetailViewModel, HomeViewModel, LearningViewModel, SearchViewModel, SettingsViewModel,
};

use super::forms::QueryInput;
use super::helpers::offset_index;
use super::navigation::Route;
use super::Services;

/// Catalog list plus the highlighted row.
pub(crate) struct HomeScreen {
    pub(crate) vm: HomeViewModel,
    pub(crate) selected: usize,
}

impl HomeScreen {
    pub(crate) fn current_item(&self) -> Option<&ContentItem> {
        self.vm.state().items.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = offset_index(self.selected, offset, self.vm.state().items.len());
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        self.move_selection(0);
    }
}

/// Search results with the query bar. `editing` is true while keystrokes go
/// into the input instead of moving the selection.
pub(crate) struct SearchScreen {
    pub(crate) vm: SearchViewModel,
    pub(crate) input: QueryInput,
    pub(crate) editing: bool,
    pub(crate) selected: usize,
}

impl SearchScreen {
    pub(crate) fn current_item(&self) -> Option<&ContentItem> {
        self.vm.state().results.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = offset_index(self.selected, offset, self.vm.state().results.len());
    }

    pub(crate) fn submit(&mut self) {
        self.vm.search(&self.input.value);
        self.editing = false;
        self.selected = 0;
    }

    /// Reset both the typed query and the results.
    pub(crate) fn clear(&mut self) {
        self.vm.clear();
        self.input = QueryInput::default();
        self.editing = true;
        self.selected = 0;
    }
}

/// The state holder backing the active route. A new one is built on every
/// navigation, so each screen's subscriptions live exactly as long as the
/// screen is shown.
pub(crate) enum Screen {
    Home(HomeScreen),
    Search(SearchScreen),
    Settings(SettingsViewModel),
    Detail(DetailViewModel),
    Learning(LearningViewModel),
}

impl Screen {
    pub(crate) fn open(route: &Route, services: &Services) -> Self {
        match route {
            Route::Home => Screen::Home(HomeScreen {
                vm: HomeViewModel::new(services.repository.clone()),
                selected: 0,
            }),
            Route::Search => Screen::Search(SearchScreen {
                vm: SearchViewModel::new(services.search.clone()),
                input: QueryInput::default(),
                editing: true,
                selected: 0,
            }),
            Route::Settings => Screen::Settings(SettingsViewModel::new(
                services.preferences.clone(),
                services.repository.clone(),
            )),
            Route::Detail { id } => {
                let mut vm = DetailViewModel::new(services.repository.clone());
                vm.load(id);
                Screen::Detail(vm)
            }
            Route::Learning { id } => {
                let mut vm =
                    LearningViewModel::new(services.repository.clone(), services.completion);
                vm.load(id);
                Screen::Learning(vm)
            }
        }
    }

    /// Advance the active state holder. Returns whether anything changed.
    pub(crate) fn sync(&mut self) -> bool {
        match self {
            Screen::Home(home) => {
                let changed = home.vm.sync();
                home.ensure_in_bounds();
                changed
            }
            Screen::Search(search) => {
                let changed = search.vm.sync();
                search.move_selection(0);
                changed
            }
            Screen::Settings(vm) => vm.sync(),
            Screen::Detail(vm) => vm.sync(),
            Screen::Learning(vm) => vm.sync(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::preferences::PreferencesStore;
    use crate::repository::{ContentRepository, SearchContent};
    use crate::viewmodel::CompletionPolicy;
    use anyhow::Result;

    fn services(dir: &std::path::Path) -> Result<Services> {
        let repository = ContentRepository::new(Database::open_in_memory()?);
        Ok(Services {
            search: SearchContent::new(repository.clone()),
            repository,
            preferences: PreferencesStore::open(&dir.join("prefs.toml"))?,
            completion: CompletionPolicy::default(),
        })
    }

    #[test]
    fn home_selection_is_clamped_to_items() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let services = services(dir.path())?;
        let mut screen = Screen::open(&Route::Home, &services);
        screen.sync();
        let Screen::Home(home) = &mut screen else {
            panic!("expected home screen");
        };
        home.move_selection(100);
        assert_eq!(home.selected, 11);
        assert_eq!(
            home.current_item().map(|item| item.title.as_str()),
            Some("Unit Testing ViewModels")
        );
        Ok(())
    }

    #[test]
    fn detail_route_loads_its_id() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let services = services(dir.path())?;
        services.repository.refresh()?;
        let mut screen = Screen::open(&Route::Detail { id: "9".into() }, &services);
        screen.sync();
        let Screen::Detail(vm) = &screen else {
            panic!("expected detail screen");
        };
        assert_eq!(vm.state().content_item.as_ref().map(|i| i.id.as_str()), Some("9"));
        Ok(())
    }
}
