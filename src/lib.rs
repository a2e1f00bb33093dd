//! Core library surface for the AndroidOne learning catalog.
//!
//! The binary only wires these pieces together. Everything below the `ui`
//! module can be driven without a terminal, which is how the integration tests
//! exercise it.
pub mod config;
pub mod db;
pub mod learning;
pub mod logging;
pub mod models;
pub mod observe;
pub mod preferences;
pub mod repository;
pub mod ui;
pub mod viewmodel;

pub use config::AppPaths;
pub use db::{Database, StoreError};
pub use models::{ContentItem, Difficulty, LearningStep};
pub use preferences::{Preferences, PreferencesStore};
pub use repository::{ContentRepository, SearchContent};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, Services};
