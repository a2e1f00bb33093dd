use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::models::ContentItem;

use super::helpers::Palette;

/// Single-line text input used by the search bar.
#[derive(Default, Clone)]
pub(crate) struct QueryInput {
    pub(crate) value: String,
}

impl QueryInput {
    /// Append a character, ignoring control characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Render the input with a ghosted placeholder when empty.
    pub(crate) fn build_line(&self, label: &str, palette: &Palette) -> Line<'static> {
        let value = if self.value.is_empty() {
            Span::styled(
                "<blank shows everything>".to_string(),
                Style::default().fg(palette.muted),
            )
        } else {
            Span::styled(self.value.clone(), Style::default().fg(palette.accent))
        };
        Line::from(vec![Span::raw(format!("{label}: ")), value])
    }
}

/// State for confirming permanent deletion of a catalog entry.
pub(crate) struct ConfirmDelete {
    pub(crate) id: String,
    pub(crate) title: String,
}

impl From<&ContentItem> for ConfirmDelete {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_are_ignored() {
        let mut input = QueryInput::default();
        assert!(input.push_char('K'));
        assert!(!input.push_char('\n'));
        assert_eq!(input.value, "K");
        input.backspace();
        input.backspace();
        assert_eq!(input.value_len(), 0);
    }
}
