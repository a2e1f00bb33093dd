//! Learning-session step generation. The steps depend only on the topic's
//! category, so the generator is a plain function with no store access.

use crate::models::LearningStep;

/// Build the walkthrough for `category`. Unknown categories get a generic
/// three-step outline. The returned list is never empty.
pub fn steps_for_category(category: &str) -> Vec<LearningStep> {
    match category {
        "Basics" => basics_steps(),
        "UI" => ui_steps(),
        "Architecture" => architecture_steps(),
        "Data" => data_steps(),
        "Networking" => networking_steps(),
        "Concurrency" => concurrency_steps(),
        "Testing" => testing_steps(),
        _ => generic_steps(),
    }
}

fn basics_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Set up the project",
            "Create a new project with an empty activity and let the build finish syncing.",
            None,
        ),
        LearningStep::new(
            "Declare values",
            "Use `val` for read-only values and `var` only when the value must change.",
            Some("val greeting = \"Hello\"\nvar count = 0"),
        ),
        LearningStep::new(
            "Write a function",
            "Functions can return expressions directly, which keeps small helpers short.",
            Some("fun square(x: Int) = x * x"),
        ),
    ]
}

fn ui_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Describe the screen",
            "Declarative UI means writing what the screen looks like for a given state.",
            None,
        ),
        LearningStep::new(
            "Compose a layout",
            "Stack children vertically with a column and horizontally with a row.",
            Some("Column {\n    Text(\"Title\")\n    Text(\"Subtitle\")\n}"),
        ),
        LearningStep::new(
            "Hold state",
            "Remembered state survives recomposition and triggers it when changed.",
            Some("var clicks by remember { mutableStateOf(0) }"),
        ),
        LearningStep::new(
            "Apply a theme",
            "Wrap the tree in a theme so colors and typography come from one place.",
            None,
        ),
    ]
}

fn architecture_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Separate the layers",
            "Split the app into UI, state holders, repositories and data sources.",
            None,
        ),
        LearningStep::new(
            "Expose state from a ViewModel",
            "A ViewModel owns screen state and exposes it as an observable stream.",
            Some(
                "private val _state = MutableStateFlow(UiState())\nval state = _state.asStateFlow()",
            ),
        ),
        LearningStep::new(
            "Add a repository",
            "Repositories are the single source of truth and hide where data comes from.",
            Some("class ContentRepository(private val dao: ContentDao)"),
        ),
        LearningStep::new(
            "Inject dependencies",
            "Pass collaborators through constructors so each layer can be replaced in tests.",
            None,
        ),
    ]
}

fn data_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Define an entity",
            "An entity maps one class to one table.",
            Some("@Entity data class Item(@PrimaryKey val id: String, val title: String)"),
        ),
        LearningStep::new(
            "Write a DAO",
            "DAOs declare the queries; the library generates the implementation.",
            Some("@Query(\"SELECT * FROM items ORDER BY title\")\nfun all(): Flow<List<Item>>"),
        ),
        LearningStep::new(
            "Observe changes",
            "Returning a stream lets the UI update whenever the table changes.",
            None,
        ),
    ]
}

fn networking_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Declare an API",
            "Describe endpoints as an interface with annotated methods.",
            Some("@GET(\"topics\")\nsuspend fun topics(): List<TopicDto>"),
        ),
        LearningStep::new(
            "Build a client",
            "Configure the base URL and a JSON converter once and reuse the client.",
            None,
        ),
        LearningStep::new(
            "Handle failures",
            "Network calls fail; map exceptions into error state instead of crashing.",
            None,
        ),
    ]
}

fn concurrency_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Launch a coroutine",
            "Start work in a scope tied to the screen so it is cancelled with it.",
            Some("viewModelScope.launch { load() }"),
        ),
        LearningStep::new(
            "Switch dispatchers",
            "Move blocking work off the main thread.",
            Some("withContext(Dispatchers.IO) { dao.all() }"),
        ),
        LearningStep::new(
            "Collect a flow",
            "Flows emit values over time; collect them to react to each one.",
            None,
        ),
    ]
}

fn testing_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Use a fake repository",
            "Fakes keep tests fast and deterministic.",
            None,
        ),
        LearningStep::new(
            "Drive the state holder",
            "Call the intent methods and assert on the resulting state.",
            Some("viewModel.load(\"1\")\nassertEquals(false, viewModel.state.value.isLoading)"),
        ),
        LearningStep::new(
            "Cover the error path",
            "Make the fake fail and check the error message reaches the state.",
            None,
        ),
    ]
}

fn generic_steps() -> Vec<LearningStep> {
    vec![
        LearningStep::new(
            "Read the overview",
            "Start with the description to learn what this topic covers.",
            None,
        ),
        LearningStep::new(
            "Try it yourself",
            "Open a sample project and reproduce the idea in a few lines of code.",
            None,
        ),
        LearningStep::new(
            "Review",
            "Summarize what you learned and note anything to revisit.",
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_has_four_steps() {
        assert_eq!(steps_for_category("Architecture").len(), 4);
    }

    #[test]
    fn every_category_yields_steps() {
        for category in [
            "Basics",
            "UI",
            "Architecture",
            "Data",
            "Networking",
            "Concurrency",
            "Testing",
            "Something else",
            "",
        ] {
            assert!(!steps_for_category(category).is_empty(), "{category}");
        }
    }

    #[test]
    fn unknown_category_uses_generic_outline() {
        assert_eq!(steps_for_category("Gardening"), generic_steps());
        assert_eq!(steps_for_category("architecture"), generic_steps());
    }
}
