//! Per-screen state holders.
//!
//! Each holder owns an immutable snapshot of its screen's state, the
//! subscriptions feeding it, and a FIFO queue of pending work. Intent methods
//! update the snapshot right away (usually flipping a loading flag) and queue
//! the store access; [`sync`](HomeViewModel::sync) runs the queue in order
//! and then drains subscriptions. The TUI calls `sync` once per tick on the
//! active screen, and dropping a holder drops its queue and subscriptions.

mod detail;
mod home;
mod learning;
mod search;
mod settings;

pub use detail::{DetailState, DetailViewModel};
pub use home::{HomeState, HomeViewModel};
pub use learning::{CompletionPolicy, LearningState, LearningViewModel};
pub use search::{SearchState, SearchViewModel};
pub use settings::{SettingsState, SettingsViewModel};

/// Shown when a lookup succeeds but nothing matches the id.
pub const NOT_FOUND_MESSAGE: &str = "Content not found";
/// Shown when a failure carries no usable text.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Turn a failure into the message a screen displays: the innermost cause,
/// or the generic fallback when that cause has no text.
pub fn error_message(err: &anyhow::Error) -> String {
    let message = err
        .chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string());
    if message.trim().is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
