use crate::models::{ContentItem, Difficulty};

/// The fixed catalog inserted the first time the store is found empty.
pub fn seed_items() -> Vec<ContentItem> {
    use Difficulty::{Advanced, Beginner, Intermediate};

    vec![
        ContentItem::new(
            "1",
            "Kotlin Fundamentals",
            "Variables, functions, null safety and the core syntax of Kotlin.",
            "Basics",
            Beginner,
            "30 min",
        ),
        ContentItem::new(
            "2",
            "Activities and Lifecycle",
            "How screens are created, paused, resumed and destroyed.",
            "Basics",
            Beginner,
            "25 min",
        ),
        ContentItem::new(
            "3",
            "Jetpack Compose Layouts",
            "Build declarative layouts with rows, columns and boxes.",
            "UI",
            Beginner,
            "40 min",
        ),
        ContentItem::new(
            "4",
            "State in Compose",
            "Remember, hoist and observe state in composable functions.",
            "UI",
            Intermediate,
            "35 min",
        ),
        ContentItem::new(
            "5",
            "Theming and Material Design",
            "Colors, typography and dark themes with Material 3.",
            "UI",
            Beginner,
            "20 min",
        ),
        ContentItem::new(
            "6",
            "MVVM Architecture",
            "Separate presentation logic into ViewModels that expose observable state.",
            "Architecture",
            Intermediate,
            "45 min",
        ),
        ContentItem::new(
            "7",
            "Dependency Injection with Hilt",
            "Provide repositories and services without manual wiring.",
            "Architecture",
            Advanced,
            "50 min",
        ),
        ContentItem::new(
            "8",
            "Local Storage with Room",
            "Persist structured records in an on-device SQLite database.",
            "Data",
            Intermediate,
            "40 min",
        ),
        ContentItem::new(
            "9",
            "Preferences with DataStore",
            "Store small key-value settings asynchronously.",
            "Data",
            Beginner,
            "20 min",
        ),
        ContentItem::new(
            "10",
            "Networking with Retrofit",
            "Call REST APIs and parse JSON responses.",
            "Networking",
            Intermediate,
            "45 min",
        ),
        ContentItem::new(
            "11",
            "Kotlin Coroutines and Flow",
            "Run asynchronous work and stream values over time.",
            "Concurrency",
            Advanced,
            "60 min",
        ),
        ContentItem::new(
            "12",
            "Unit Testing ViewModels",
            "Verify state transitions with fakes and test dispatchers.",
            "Testing",
            Intermediate,
            "35 min",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique() {
        let items = seed_items();
        let ids: HashSet<_> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
    }
}
