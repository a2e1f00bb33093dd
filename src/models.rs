//! Domain models that mirror the SQLite schema and get passed throughout the
//! state holders and the TUI. These types stay light-weight data holders so
//! other layers can focus on presentation and persistence logic.

use std::fmt;
use std::str::FromStr;

use crate::db::StoreError;

/// Fixed set of difficulty labels a topic can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Label persisted in the `difficulty` column and shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Beginner" => Ok(Difficulty::Beginner),
            "Intermediate" => Ok(Difficulty::Intermediate),
            "Advanced" => Ok(Difficulty::Advanced),
            other => Err(StoreError::InvalidDifficulty(other.to_string())),
        }
    }
}

/// A catalog entry. The struct mirrors one row of the `content_items` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Primary key. Stable for the lifetime of the record; every other field
    /// may be edited.
    pub id: String,
    /// Title displayed in lists and used as the sort key.
    pub title: String,
    pub description: String,
    /// Free-text grouping label. Also selects which learning steps a session
    /// walks through.
    pub category: String,
    pub difficulty: Difficulty,
    /// Free-text duration label such as `30 min`.
    pub estimated_time: String,
}

impl ContentItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        estimated_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            difficulty,
            estimated_time: estimated_time.into(),
        }
    }

    /// Whether `query` appears verbatim (case-sensitive) in the title,
    /// description or category. Mirrors the SQL search predicate so callers
    /// can filter in memory with identical results.
    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query)
            || self.description.contains(query)
            || self.category.contains(query)
    }

    /// Compose a `Category · Difficulty · Time` summary line used by list rows.
    pub fn summary_line(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if !self.category.trim().is_empty() {
            parts.push(self.category.clone());
        }
        parts.push(self.difficulty.label().to_string());
        if !self.estimated_time.trim().is_empty() {
            parts.push(self.estimated_time.clone());
        }
        parts.join(" · ")
    }
}

impl fmt::Display for ContentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// One instructional step of a learning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningStep {
    pub title: String,
    pub body: String,
    /// Optional snippet rendered below the body.
    pub code: Option<String>,
}

impl LearningStep {
    pub fn new(title: &str, body: &str, code: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            code: code.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_round_trips_through_its_label() {
        for difficulty in [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ] {
            assert_eq!(difficulty.label().parse::<Difficulty>().ok(), Some(difficulty));
        }
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let err = "Expert".parse::<Difficulty>().unwrap_err();
        assert!(matches!(err, StoreError::InvalidDifficulty(label) if label == "Expert"));
    }

    #[test]
    fn matches_is_case_sensitive_across_fields() {
        let item = ContentItem::new(
            "x",
            "State in Compose",
            "Hoist state",
            "UI",
            Difficulty::Intermediate,
            "35 min",
        );
        assert!(item.matches("Compose"));
        assert!(item.matches("Hoist"));
        assert!(item.matches("UI"));
        assert!(!item.matches("compose"));
        assert!(!item.matches("ui"));
    }

    #[test]
    fn summary_line_skips_blank_fields() {
        let item = ContentItem::new("x", "T", "", " ", Difficulty::Beginner, "");
        assert_eq!(item.summary_line(), "Beginner");
    }
}
