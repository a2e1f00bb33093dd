use std::collections::VecDeque;

use log::warn;

use crate::models::ContentItem;
use crate::observe::Subscription;
use crate::repository::ContentRepository;

use super::{error_message, NOT_FOUND_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HomeState {
    pub items: Vec<ContentItem>,
    /// True until the catalog stream delivers its first value.
    pub is_loading: bool,
    /// True while a seed/refresh pass is queued or running.
    pub is_refreshing: bool,
    pub error: Option<String>,
}

enum HomeTask {
    Refresh,
    Delete(String),
}

/// Which side produced the current error. A fresh emission only clears a
/// stream error; a successful refresh only clears a task error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorSource {
    Stream,
    Task,
}

/// Landing screen: the full catalog, kept current by a subscription, plus a
/// refresh that seeds the store on first run.
pub struct HomeViewModel {
    repository: ContentRepository,
    state: HomeState,
    items: Option<Subscription<Vec<ContentItem>>>,
    pending: VecDeque<HomeTask>,
    error_source: Option<ErrorSource>,
    deleted: Vec<String>,
}

impl HomeViewModel {
    /// Subscribe to the catalog and queue the first refresh.
    pub fn new(repository: ContentRepository) -> Self {
        let mut vm = Self {
            repository,
            state: HomeState::default(),
            items: None,
            pending: VecDeque::new(),
            error_source: None,
            deleted: Vec::new(),
        };
        vm.subscribe();
        vm.refresh();
        vm
    }

    pub fn state(&self) -> &HomeState {
        &self.state
    }

    /// Queue a manual refresh. Only the refreshing flag moves until it runs.
    pub fn refresh(&mut self) {
        self.state = HomeState {
            is_refreshing: true,
            ..self.state.clone()
        };
        self.pending.push_back(HomeTask::Refresh);
    }

    /// Re-subscribe after a stream failure and refresh again.
    pub fn retry(&mut self) {
        self.subscribe();
        self.refresh();
    }

    pub fn dismiss_error(&mut self) {
        self.clear_error(None);
    }

    pub fn delete(&mut self, id: &str) {
        self.pending.push_back(HomeTask::Delete(id.to_string()));
    }

    /// Ids removed by queued deletes since the last call.
    pub fn take_deleted(&mut self) -> Vec<String> {
        std::mem::take(&mut self.deleted)
    }

    /// Run queued work, then apply any new catalog emission. Returns whether
    /// the snapshot changed.
    pub fn sync(&mut self) -> bool {
        let before = self.state.clone();

        while let Some(task) = self.pending.pop_front() {
            match task {
                HomeTask::Refresh => self.run_refresh(),
                HomeTask::Delete(id) => self.run_delete(&id),
            }
        }

        if let Some(update) = self.items.as_mut().and_then(Subscription::next_update) {
            match update {
                Ok(items) => {
                    self.state = HomeState {
                        items,
                        is_loading: false,
                        ..self.state.clone()
                    };
                    self.clear_error(Some(ErrorSource::Stream));
                }
                Err(err) => {
                    warn!("catalog stream failed: {err:#}");
                    self.state = HomeState {
                        is_loading: false,
                        ..self.state.clone()
                    };
                    self.fail(ErrorSource::Stream, error_message(&err));
                }
            }
        }

        self.state != before
    }

    fn subscribe(&mut self) {
        self.items = Some(self.repository.observe_all());
        self.state = HomeState {
            is_loading: true,
            ..self.state.clone()
        };
    }

    fn run_refresh(&mut self) {
        let result = self.repository.refresh();
        self.state = HomeState {
            is_refreshing: false,
            ..self.state.clone()
        };
        match result {
            Ok(_) => self.clear_error(Some(ErrorSource::Task)),
            Err(err) => {
                warn!("catalog refresh failed: {err:#}");
                self.fail(ErrorSource::Task, error_message(&err));
            }
        }
    }

    fn run_delete(&mut self, id: &str) {
        match self.repository.delete(id) {
            Ok(true) => self.deleted.push(id.to_string()),
            Ok(false) => self.fail(ErrorSource::Task, NOT_FOUND_MESSAGE.to_string()),
            Err(err) => {
                warn!("failed to delete content {id}: {err:#}");
                self.fail(ErrorSource::Task, error_message(&err));
            }
        }
    }

    fn fail(&mut self, source: ErrorSource, message: String) {
        self.error_source = Some(source);
        self.state = HomeState {
            error: Some(message),
            ..self.state.clone()
        };
    }

    /// Clear the error if it came from `source`, or unconditionally when
    /// `source` is `None`.
    fn clear_error(&mut self, source: Option<ErrorSource>) {
        if source.is_some() && source != self.error_source {
            return;
        }
        self.error_source = None;
        self.state = HomeState {
            error: None,
            ..self.state.clone()
        };
    }
}
