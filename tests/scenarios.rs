use android_one::viewmodel::{
    CompletionPolicy, DetailViewModel, HomeViewModel, LearningViewModel, SearchViewModel,
    SettingsViewModel, NOT_FOUND_MESSAGE,
};
use android_one::{
    db, ContentItem, ContentRepository, Database, Difficulty, PreferencesStore, SearchContent,
};
use anyhow::Result;

fn repository() -> Result<ContentRepository> {
    Ok(ContentRepository::new(Database::open_in_memory()?))
}

fn titles(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|item| item.title.as_str()).collect()
}

#[test]
fn first_launch_shows_loading_then_the_seed_set() -> Result<()> {
    let repo = repository()?;
    let mut home = HomeViewModel::new(repo.clone());
    assert!(home.state().is_loading);
    assert!(home.state().items.is_empty());

    home.sync();
    home.sync();

    let state = home.state();
    assert_eq!(state.items.len(), db::seed_items().len());
    assert!(!state.is_loading);
    assert!(!state.is_refreshing);
    assert!(state.error.is_none());
    Ok(())
}

#[test]
fn refresh_seeds_once() -> Result<()> {
    let repo = repository()?;
    assert_eq!(repo.refresh()?, 12);
    let first = repo.all_items()?;

    assert_eq!(repo.refresh()?, 0);
    assert_eq!(repo.all_items()?, first);
    Ok(())
}

#[test]
fn absent_id_is_not_found() -> Result<()> {
    let repo = repository()?;
    repo.refresh()?;
    assert!(repo.item("does-not-exist")?.is_none());

    let mut detail = DetailViewModel::new(repo);
    detail.load("does-not-exist");
    detail.sync();

    let state = detail.state();
    assert!(!state.is_loading);
    assert!(state.content_item.is_none());
    assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));
    Ok(())
}

#[test]
fn search_returns_matching_subset_in_title_order() -> Result<()> {
    let repo = repository()?;
    repo.refresh()?;
    let mut search = SearchViewModel::new(SearchContent::new(repo.clone()));

    search.search("Compose");
    search.sync();

    let state = search.state();
    assert!(!state.is_loading);
    assert_eq!(
        titles(&state.results),
        ["Jetpack Compose Layouts", "State in Compose"]
    );

    let expected: Vec<ContentItem> = repo
        .all_items()?
        .into_iter()
        .filter(|item| item.matches("Compose"))
        .collect();
    assert_eq!(state.results, expected);
    Ok(())
}

#[test]
fn search_is_case_sensitive() -> Result<()> {
    let repo = repository()?;
    repo.refresh()?;
    let mut feed = SearchContent::new(repo).execute("compose");
    let results = feed.next_update().transpose()?.unwrap_or_default();
    assert!(results.is_empty());
    Ok(())
}

#[test]
fn blank_query_matches_full_listing() -> Result<()> {
    let repo = repository()?;
    repo.refresh()?;
    let search = SearchContent::new(repo.clone());

    for query in ["", "   "] {
        let mut feed = search.execute(query);
        let results = feed.next_update().transpose()?.unwrap_or_default();
        assert_eq!(results, repo.all_items()?);
    }
    Ok(())
}

#[test]
fn search_results_follow_catalog_changes() -> Result<()> {
    let repo = repository()?;
    repo.refresh()?;
    let mut search = SearchViewModel::new(SearchContent::new(repo.clone()));
    search.search("Data");
    search.sync();
    assert_eq!(search.state().results.len(), 2);

    repo.create(ContentItem::new(
        "",
        "Paging Big Data Sets",
        "Load long lists page by page.",
        "Data",
        Difficulty::Advanced,
        "30 min",
    ))?;
    assert!(search.sync());
    assert_eq!(search.state().results.len(), 3);
    Ok(())
}

#[test]
fn learning_steps_are_bounded() -> Result<()> {
    let repo = repository()?;
    repo.refresh()?;
    let mut learning = LearningViewModel::new(repo, CompletionPolicy::default());
    learning.load("1");
    learning.sync();
    let total = learning.state().total_steps;
    assert!(total > 0);

    learning.previous();
    assert_eq!(learning.state().current_step, 1);

    for _ in 0..total + 3 {
        learning.next();
    }
    let state = learning.state();
    assert_eq!(state.current_step, total);

    let steps = android_one::learning::steps_for_category("Basics");
    let last = &steps[total - 1];
    assert_eq!(state.step_title, last.title);
    assert_eq!(state.step_content, last.body);
    assert_eq!(state.code_example, last.code);
    Ok(())
}

#[test]
fn architecture_session_completes_on_the_last_step() -> Result<()> {
    let repo = repository()?;
    repo.refresh()?;
    let mut learning = LearningViewModel::new(repo, CompletionPolicy::default());
    learning.load("6");
    learning.sync();
    assert_eq!(learning.state().total_steps, 4);

    for _ in 0..3 {
        learning.next();
    }
    learning.complete();

    let state = learning.state();
    assert!(state.is_completed);
    assert_eq!(state.current_step, 4);
    Ok(())
}

#[test]
fn dark_mode_survives_reopening() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("preferences.toml");
    let repo = repository()?;

    let mut settings = SettingsViewModel::new(PreferencesStore::open(&path)?, repo.clone());
    settings.sync();
    assert!(!settings.state().dark_mode);

    settings.toggle_dark_mode();
    settings.sync();
    assert!(settings.state().dark_mode);
    assert!(settings.state().notifications_enabled);

    let reopened = PreferencesStore::open(&path)?;
    assert!(reopened.current()?.dark_mode);

    let mut settings = SettingsViewModel::new(reopened, repo);
    settings.sync();
    assert!(settings.state().dark_mode);
    Ok(())
}

#[test]
fn catalog_survives_reopening_the_database() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("catalog.sqlite");

    let repo = ContentRepository::new(Database::open_at(&path)?);
    repo.refresh()?;
    assert!(repo.delete("12")?);
    drop(repo);

    let repo = ContentRepository::new(Database::open_at(&path)?);
    assert_eq!(repo.refresh()?, 0);
    assert_eq!(repo.all_items()?.len(), 11);
    Ok(())
}
