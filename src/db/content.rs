use anyhow::{Context, Result};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension, Row};

use crate::db::StoreError;
use crate::models::{ContentItem, Difficulty};

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, category, difficulty, estimated_time FROM content_items";

/// Map one result row into a `ContentItem`. Unknown difficulty labels are
/// reported as a conversion failure for the offending column.
fn read_item(row: &Row<'_>) -> rusqlite::Result<ContentItem> {
    let difficulty: String = row.get(4)?;
    let difficulty = difficulty.parse::<Difficulty>().map_err(|err| {
        SqlError::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(err))
    })?;

    Ok(ContentItem {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        difficulty,
        estimated_time: row.get(5)?,
    })
}

/// Retrieve every item sorted by title. The query doubles as the single
/// source of truth for how the catalog is ordered everywhere in the UI.
pub fn fetch_all_items(conn: &Connection) -> Result<Vec<ContentItem>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY title"))
        .context("failed to prepare catalog query")?;

    let items = stmt
        .query_map([], read_item)
        .context("failed to load catalog")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect catalog")?;

    Ok(items)
}

/// Case-sensitive substring search over title, description and category.
/// `instr` is used instead of `LIKE` because `LIKE` folds ASCII case and
/// treats `%`/`_` as wildcards.
pub fn search_items(conn: &Connection, query: &str) -> Result<Vec<ContentItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE instr(title, ?1) > 0
                OR instr(description, ?1) > 0
                OR instr(category, ?1) > 0
             ORDER BY title"
        ))
        .context("failed to prepare search query")?;

    let items = stmt
        .query_map([query], read_item)
        .context("failed to run search")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect search results")?;

    Ok(items)
}

/// Point lookup. `None` means the id is not in the store.
pub fn fetch_item(conn: &Connection, id: &str) -> Result<Option<ContentItem>> {
    conn.query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], read_item)
        .optional()
        .context("failed to load content item")
}

pub fn count_items(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM content_items", [], |row| row.get(0))
        .context("failed to count content items")
}

/// Insert a batch of items inside one transaction so a partial seed never
/// becomes visible.
pub fn insert_items(conn: &Connection, items: &[ContentItem]) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to start insert transaction")?;
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO content_items
                    (id, title, description, category, difficulty, estimated_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .context("failed to prepare bulk insert")?;
        for item in items {
            stmt.execute(params![
                item.id,
                item.title,
                item.description,
                item.category,
                item.difficulty.label(),
                item.estimated_time,
            ])
            .map_err(|err| map_unique_constraint(err, &item.id))
            .context("failed to insert content item")?;
        }
    }
    tx.commit().context("failed to commit bulk insert")?;
    Ok(items.len())
}

pub fn insert_item(conn: &Connection, item: &ContentItem) -> Result<()> {
    conn.execute(
        "INSERT INTO content_items
            (id, title, description, category, difficulty, estimated_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            item.id,
            item.title,
            item.description,
            item.category,
            item.difficulty.label(),
            item.estimated_time,
        ],
    )
    .map_err(|err| map_unique_constraint(err, &item.id))
    .context("failed to insert content item")?;
    Ok(())
}

/// Update every editable field. Surfaces `StoreError::NotFound` when zero rows
/// are touched so callers can tell a stale id from a silent success.
pub fn update_item(conn: &Connection, item: &ContentItem) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE content_items
             SET title = ?1, description = ?2, category = ?3, difficulty = ?4,
                 estimated_time = ?5
             WHERE id = ?6",
            params![
                item.title,
                item.description,
                item.category,
                item.difficulty.label(),
                item.estimated_time,
                item.id,
            ],
        )
        .context("failed to update content item")?;

    if updated == 0 {
        Err(StoreError::NotFound(item.id.clone()).into())
    } else {
        Ok(())
    }
}

/// Remove a single item, returning whether a row matched.
pub fn delete_item(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM content_items WHERE id = ?1", [id])
        .context("failed to delete content item")?;
    Ok(deleted > 0)
}

pub fn delete_all_items(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM content_items", [])
        .context("failed to clear content items")
}

/// Coerce primary-key violations into a typed error. Anything else is passed
/// through untouched.
fn map_unique_constraint(err: SqlError, id: &str) -> anyhow::Error {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        StoreError::DuplicateId(id.to_string()).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed_items, Database};

    fn seeded() -> Result<Database> {
        let db = Database::open_in_memory()?;
        db.with_conn(|conn| insert_items(conn, &seed_items()))?;
        Ok(db)
    }

    fn titles(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|item| item.title.as_str()).collect()
    }

    #[test]
    fn fetch_all_orders_by_title() -> Result<()> {
        let db = seeded()?;
        let items = db.with_conn(fetch_all_items)?;
        let mut sorted = titles(&items);
        sorted.sort();
        assert_eq!(titles(&items), sorted);
        assert_eq!(items.len(), 12);
        Ok(())
    }

    #[test]
    fn search_matches_exactly_the_in_memory_predicate() -> Result<()> {
        let db = seeded()?;
        let all = db.with_conn(fetch_all_items)?;
        for query in ["Compose", "compose", "Data", "Architecture", "Kotlin", "min", "zzz"] {
            let found = db.with_conn(|conn| search_items(conn, query))?;
            let expected: Vec<ContentItem> =
                all.iter().filter(|item| item.matches(query)).cloned().collect();
            assert_eq!(found, expected, "query {query:?}");
        }
        Ok(())
    }

    #[test]
    fn search_treats_like_wildcards_literally() -> Result<()> {
        let db = seeded()?;
        let found = db.with_conn(|conn| search_items(conn, "%"))?;
        assert!(found.is_empty());
        Ok(())
    }

    #[test]
    fn missing_item_is_none() -> Result<()> {
        let db = seeded()?;
        assert!(db.with_conn(|conn| fetch_item(conn, "nope"))?.is_none());
        Ok(())
    }

    #[test]
    fn duplicate_insert_is_typed() -> Result<()> {
        let db = seeded()?;
        let mut item = seed_items().remove(0);
        item.title = "Another".into();
        let err = db.with_conn(|conn| insert_item(conn, &item)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::DuplicateId(item.id.clone()))
        );
        Ok(())
    }

    #[test]
    fn update_and_delete_report_missing_rows() -> Result<()> {
        let db = Database::open_in_memory()?;
        let item = seed_items().remove(0);

        let err = db.with_conn(|conn| update_item(conn, &item)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(_))
        ));
        assert!(!db.with_conn(|conn| delete_item(conn, &item.id))?);

        db.with_conn(|conn| insert_item(conn, &item))?;
        assert!(db.with_conn(|conn| delete_item(conn, &item.id))?);
        assert_eq!(db.with_conn(count_items)?, 0);
        Ok(())
    }

    #[test]
    fn unknown_difficulty_in_a_row_fails_the_read() -> Result<()> {
        let db = Database::open_in_memory()?;
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO content_items VALUES ('x', 'T', 'D', 'C', 'Expert', '1 min')",
                [],
            )?;
            Ok(())
        })?;
        assert!(db.with_conn(fetch_all_items).is_err());
        Ok(())
    }
}
