//! The catalog repository: the one place presentation code goes through to
//! read or change content records. It never catches store failures; state
//! holders translate them into messages.

use anyhow::Result;
use log::{debug, info};
use uuid::Uuid;

use crate::db::{self, Database, StoreError};
use crate::models::ContentItem;
use crate::observe::Subscription;

#[derive(Clone)]
pub struct ContentRepository {
    db: Database,
}

impl ContentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every item, title ascending, re-emitted after each write.
    pub fn observe_all(&self) -> Subscription<Vec<ContentItem>> {
        let store = self.db.clone();
        Subscription::new(self.db.watch(), move || store.with_conn(db::fetch_all_items))
    }

    /// Items whose title, description or category contains `query`
    /// (case-sensitive). An empty query is passed through as-is.
    pub fn observe_search(&self, query: &str) -> Subscription<Vec<ContentItem>> {
        let store = self.db.clone();
        let query = query.to_string();
        Subscription::new(self.db.watch(), move || {
            store.with_conn(|conn| db::search_items(conn, &query))
        })
    }

    pub fn all_items(&self) -> Result<Vec<ContentItem>> {
        self.db.with_conn(db::fetch_all_items)
    }

    /// Point lookup; `Ok(None)` means not found.
    pub fn item(&self, id: &str) -> Result<Option<ContentItem>> {
        self.db.with_conn(|conn| db::fetch_item(conn, id))
    }

    /// Seed the store if and only if it is empty. Returns how many rows were
    /// inserted, which is zero on every call after the first.
    pub fn refresh(&self) -> Result<usize> {
        let inserted = self.db.with_conn(|conn| {
            if db::count_items(conn)? > 0 {
                return Ok(0);
            }
            db::insert_items(conn, &db::seed_items())
        })?;

        if inserted > 0 {
            info!("seeded catalog with {inserted} items");
            self.db.notify_changed();
        } else {
            debug!("catalog already populated, skipping seed");
        }
        Ok(inserted)
    }

    /// Insert a new item. A blank id is replaced with a generated one.
    pub fn create(&self, item: ContentItem) -> Result<ContentItem> {
        let mut item = normalize(item)?;
        if item.id.is_empty() {
            item.id = Uuid::new_v4().to_string();
        }
        self.db.with_conn(|conn| db::insert_item(conn, &item))?;
        self.db.notify_changed();
        Ok(item)
    }

    pub fn update(&self, item: ContentItem) -> Result<ContentItem> {
        let item = normalize(item)?;
        self.db.with_conn(|conn| db::update_item(conn, &item))?;
        self.db.notify_changed();
        Ok(item)
    }

    /// Remove the item with `id`, returning whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.db.with_conn(|conn| db::delete_item(conn, id))?;
        if deleted {
            info!("deleted content item {id}");
            self.db.notify_changed();
        }
        Ok(deleted)
    }

    /// Bulk clear. Returns the number of removed rows.
    pub fn clear(&self) -> Result<usize> {
        let removed = self.db.with_conn(db::delete_all_items)?;
        info!("cleared {removed} content items");
        self.db.notify_changed();
        Ok(removed)
    }
}

/// Trim every text field and reject blank titles.
fn normalize(item: ContentItem) -> Result<ContentItem> {
    let item = ContentItem {
        id: item.id.trim().to_string(),
        title: item.title.trim().to_string(),
        description: item.description.trim().to_string(),
        category: item.category.trim().to_string(),
        difficulty: item.difficulty,
        estimated_time: item.estimated_time.trim().to_string(),
    };
    if item.title.is_empty() {
        return Err(StoreError::EmptyTitle.into());
    }
    Ok(item)
}

/// Front door for the search screen. A blank query shows the whole catalog
/// instead of running a substring match against the empty string.
#[derive(Clone)]
pub struct SearchContent {
    repository: ContentRepository,
}

impl SearchContent {
    pub fn new(repository: ContentRepository) -> Self {
        Self { repository }
    }

    pub fn execute(&self, query: &str) -> Subscription<Vec<ContentItem>> {
        if query.trim().is_empty() {
            self.repository.observe_all()
        } else {
            self.repository.observe_search(query)
        }
    }
}
