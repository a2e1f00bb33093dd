use std::collections::VecDeque;

use log::warn;

use crate::models::ContentItem;
use crate::repository::ContentRepository;

use super::{error_message, NOT_FOUND_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailState {
    pub content_item: Option<ContentItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Single-item screen. Nothing happens at construction; the id only becomes
/// known when the screen is navigated to.
pub struct DetailViewModel {
    repository: ContentRepository,
    state: DetailState,
    last_id: Option<String>,
    pending: VecDeque<String>,
}

impl DetailViewModel {
    pub fn new(repository: ContentRepository) -> Self {
        Self {
            repository,
            state: DetailState::default(),
            last_id: None,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn load(&mut self, id: &str) {
        self.state = DetailState {
            is_loading: true,
            error: None,
            ..self.state.clone()
        };
        self.last_id = Some(id.to_string());
        self.pending.push_back(id.to_string());
    }

    /// Repeat the last load, if any.
    pub fn retry(&mut self) {
        if let Some(id) = self.last_id.clone() {
            self.load(&id);
        }
    }

    pub fn sync(&mut self) -> bool {
        let before = self.state.clone();
        while let Some(id) = self.pending.pop_front() {
            self.state = match self.repository.item(&id) {
                Ok(Some(item)) => DetailState {
                    content_item: Some(item),
                    is_loading: false,
                    error: None,
                },
                Ok(None) => DetailState {
                    content_item: None,
                    is_loading: false,
                    error: Some(NOT_FOUND_MESSAGE.to_string()),
                },
                Err(err) => {
                    warn!("failed to load content {id}: {err:#}");
                    DetailState {
                        is_loading: false,
                        error: Some(error_message(&err)),
                        ..self.state.clone()
                    }
                }
            };
        }
        self.state != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use anyhow::Result;

    fn seeded() -> Result<(Database, DetailViewModel)> {
        let db = Database::open_in_memory()?;
        let repository = ContentRepository::new(db.clone());
        repository.refresh()?;
        Ok((db, DetailViewModel::new(repository)))
    }

    #[test]
    fn nothing_loads_at_construction() -> Result<()> {
        let (_db, mut vm) = seeded()?;
        assert_eq!(vm.state(), &DetailState::default());
        assert!(!vm.sync());
        Ok(())
    }

    #[test]
    fn load_marks_loading_then_resolves() -> Result<()> {
        let (_db, mut vm) = seeded()?;
        vm.load("6");
        assert!(vm.state().is_loading);
        assert_eq!(vm.state().error, None);

        vm.sync();
        let state = vm.state();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(
            state.content_item.as_ref().map(|item| item.title.as_str()),
            Some("MVVM Architecture")
        );
        Ok(())
    }

    #[test]
    fn missing_id_blanks_the_item() -> Result<()> {
        let (_db, mut vm) = seeded()?;
        vm.load("6");
        vm.sync();
        vm.load("404");
        vm.sync();
        assert_eq!(
            vm.state(),
            &DetailState {
                content_item: None,
                is_loading: false,
                error: Some(NOT_FOUND_MESSAGE.to_string()),
            }
        );
        Ok(())
    }

    #[test]
    fn store_failure_surfaces_message() -> Result<()> {
        let (db, mut vm) = seeded()?;
        db.with_conn(|conn| {
            conn.execute("DROP TABLE content_items", [])?;
            Ok(())
        })?;
        vm.load("1");
        vm.sync();
        let state = vm.state();
        assert!(!state.is_loading);
        assert!(state.error.as_deref().is_some_and(|m| !m.is_empty()));
        Ok(())
    }

    #[test]
    fn retry_reloads_last_id() -> Result<()> {
        let (_db, mut vm) = seeded()?;
        vm.retry();
        assert!(!vm.state().is_loading);

        vm.load("2");
        vm.sync();
        vm.retry();
        assert!(vm.state().is_loading);
        vm.sync();
        assert_eq!(vm.state().content_item.as_ref().map(|i| i.id.as_str()), Some("2"));
        Ok(())
    }
}
