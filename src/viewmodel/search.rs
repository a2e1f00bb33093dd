use log::warn;

use crate::models::ContentItem;
use crate::observe::Subscription;
use crate::repository::SearchContent;

use super::error_message;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    /// The last submitted query, kept so the screen can echo it back.
    pub query: String,
    pub results: Vec<ContentItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// On-demand search: nothing is observed until a query is submitted, and each
/// submission replaces the previous subscription.
pub struct SearchViewModel {
    search: SearchContent,
    state: SearchState,
    results: Option<Subscription<Vec<ContentItem>>>,
}

impl SearchViewModel {
    pub fn new(search: SearchContent) -> Self {
        Self {
            search,
            state: SearchState::default(),
            results: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn search(&mut self, query: &str) {
        self.results = Some(self.search.execute(query));
        self.state = SearchState {
            query: query.to_string(),
            is_loading: true,
            ..self.state.clone()
        };
    }

    /// Re-run the last submitted query.
    pub fn retry(&mut self) {
        let query = self.state.query.clone();
        self.search(&query);
    }

    /// Full reset: results, flags, error and the stored query all return to
    /// their defaults, and the live subscription is dropped.
    pub fn clear(&mut self) {
        self.results = None;
        self.state = SearchState::default();
    }

    pub fn sync(&mut self) -> bool {
        let Some(update) = self.results.as_mut().and_then(Subscription::next_update) else {
            return false;
        };

        let before = self.state.clone();
        self.state = match update {
            Ok(results) => SearchState {
                results,
                is_loading: false,
                error: None,
                ..self.state.clone()
            },
            Err(err) => {
                warn!("search for {:?} failed: {err:#}", self.state.query);
                SearchState {
                    is_loading: false,
                    error: Some(error_message(&err)),
                    ..self.state.clone()
                }
            }
        };
        self.state != before
    }
}
