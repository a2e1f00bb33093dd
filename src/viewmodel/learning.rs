use std::collections::VecDeque;

use log::{info, warn};

use crate::learning::steps_for_category;
use crate::models::{ContentItem, LearningStep};
use crate::repository::ContentRepository;

use super::{error_message, NOT_FOUND_MESSAGE};

/// What Next/Previous do once a session is marked complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Keep stepping so the user can review finished material.
    #[default]
    AllowReview,
    /// Freeze the position on completion.
    Lock,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LearningState {
    pub content_item: Option<ContentItem>,
    /// 1-indexed; zero until a session is loaded.
    pub current_step: usize,
    pub total_steps: usize,
    pub step_title: String,
    pub step_content: String,
    pub code_example: Option<String>,
    pub is_completed: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Step-by-step walkthrough generated from one item's category.
pub struct LearningViewModel {
    repository: ContentRepository,
    policy: CompletionPolicy,
    steps: Vec<LearningStep>,
    state: LearningState,
    pending: VecDeque<String>,
}

impl LearningViewModel {
    pub fn new(repository: ContentRepository, policy: CompletionPolicy) -> Self {
        Self {
            repository,
            policy,
            steps: Vec::new(),
            state: LearningState::default(),
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &LearningState {
        &self.state
    }

    pub fn load(&mut self, id: &str) {
        self.state = LearningState {
            is_loading: true,
            error: None,
            ..self.state.clone()
        };
        self.pending.push_back(id.to_string());
    }

    pub fn next(&mut self) {
        if self.is_locked() || self.state.current_step >= self.state.total_steps {
            return;
        }
        self.show_step(self.state.current_step + 1);
    }

    pub fn previous(&mut self) {
        if self.is_locked() || self.state.current_step <= 1 {
            return;
        }
        self.show_step(self.state.current_step - 1);
    }

    /// Mark the session finished without moving the position.
    pub fn complete(&mut self) {
        if self.steps.is_empty() {
            return;
        }
        if let Some(item) = &self.state.content_item {
            info!("completed learning session for {}", item.id);
        }
        self.state = LearningState {
            is_completed: true,
            ..self.state.clone()
        };
    }

    pub fn sync(&mut self) -> bool {
        let before = self.state.clone();
        while let Some(id) = self.pending.pop_front() {
            match self.repository.item(&id) {
                Ok(Some(item)) => self.start(item),
                Ok(None) => {
                    self.steps.clear();
                    self.state = LearningState {
                        error: Some(NOT_FOUND_MESSAGE.to_string()),
                        ..LearningState::default()
                    };
                }
                Err(err) => {
                    warn!("failed to start learning session for {id}: {err:#}");
                    self.state = LearningState {
                        is_loading: false,
                        error: Some(error_message(&err)),
                        ..self.state.clone()
                    };
                }
            }
        }
        self.state != before
    }

    fn start(&mut self, item: ContentItem) {
        self.steps = steps_for_category(&item.category);
        self.state = LearningState {
            content_item: Some(item),
            total_steps: self.steps.len(),
            ..LearningState::default()
        };
        self.show_step(1);
    }

    /// Move to `number` (1-indexed) and copy that step's fields into state.
    fn show_step(&mut self, number: usize) {
        let Some(step) = number.checked_sub(1).and_then(|idx| self.steps.get(idx)) else {
            return;
        };
        self.state = LearningState {
            current_step: number,
            step_title: step.title.clone(),
            step_content: step.body.clone(),
            code_example: step.code.clone(),
            ..self.state.clone()
        };
    }

    fn is_locked(&self) -> bool {
        self.policy == CompletionPolicy::Lock && self.state.is_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use anyhow::Result;

    fn session(id: &str, policy: CompletionPolicy) -> Result<LearningViewModel> {
        let repository = ContentRepository::new(Database::open_in_memory()?);
        repository.refresh()?;
        let mut vm = LearningViewModel::new(repository, policy);
        vm.load(id);
        vm.sync();
        Ok(vm)
    }

    fn assert_in_sync(vm: &LearningViewModel) {
        let state = vm.state();
        let step = &vm.steps[state.current_step - 1];
        assert_eq!(state.step_title, step.title);
        assert_eq!(state.step_content, step.body);
        assert_eq!(state.code_example, step.code);
    }

    #[test]
    fn loading_starts_at_step_one() -> Result<()> {
        let vm = session("6", CompletionPolicy::default())?;
        let state = vm.state();
        assert_eq!(state.current_step, 1);
        assert_eq!(state.total_steps, 4);
        assert!(!state.is_loading);
        assert!(!state.is_completed);
        assert_in_sync(&vm);
        Ok(())
    }

    #[test]
    fn stepping_is_bounded_and_stays_in_sync() -> Result<()> {
        let mut vm = session("1", CompletionPolicy::default())?;
        let total = vm.state().total_steps;

        vm.previous();
        assert_eq!(vm.state().current_step, 1);

        for expected in 2..=total {
            vm.next();
            assert_eq!(vm.state().current_step, expected);
            assert_in_sync(&vm);
        }
        let at_end = vm.state().clone();
        vm.next();
        assert_eq!(vm.state(), &at_end);

        vm.previous();
        assert_eq!(vm.state().current_step, total - 1);
        assert_in_sync(&vm);
        Ok(())
    }

    #[test]
    fn review_after_completion_is_allowed_by_default() -> Result<()> {
        let mut vm = session("6", CompletionPolicy::AllowReview)?;
        vm.next();
        vm.complete();
        assert!(vm.state().is_completed);
        assert_eq!(vm.state().current_step, 2);

        vm.previous();
        assert_eq!(vm.state().current_step, 1);
        assert!(vm.state().is_completed);
        Ok(())
    }

    #[test]
    fn lock_policy_freezes_position() -> Result<()> {
        let mut vm = session("6", CompletionPolicy::Lock)?;
        vm.next();
        vm.complete();
        vm.next();
        vm.previous();
        assert_eq!(vm.state().current_step, 2);
        Ok(())
    }

    #[test]
    fn missing_item_reports_not_found() -> Result<()> {
        let vm = session("missing", CompletionPolicy::default())?;
        let state = vm.state();
        assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));
        assert_eq!(state.total_steps, 0);
        assert!(!state.is_loading);
        Ok(())
    }

    #[test]
    fn transitions_before_loading_are_no_ops() -> Result<()> {
        let repository = ContentRepository::new(Database::open_in_memory()?);
        let mut vm = LearningViewModel::new(repository, CompletionPolicy::default());
        vm.next();
        vm.previous();
        vm.complete();
        assert_eq!(vm.state(), &LearningState::default());
        Ok(())
    }
}
