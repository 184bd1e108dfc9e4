//! Full-replace writes against a target store.

use rusqlite::{params, Connection, Transaction};

use fillsync_core::item::FillItem;

use crate::error::SyncError;

/// Create the items table on a fresh store. The schema matches what
/// the fill event processor reads back between runs.
pub fn ensure_table(conn: &Connection, table: &str) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
             id INTEGER PRIMARY KEY, \
             name TEXT NOT NULL, \
             device TEXT NOT NULL, \
             type TEXT NOT NULL, \
             duration INTEGER NOT NULL, \
             weight INTEGER NOT NULL, \
             description TEXT NOT NULL DEFAULT '')"
    ))
}

/// Replace the table's entire contents with `items`, inside `tx`.
///
/// An empty `items` still clears the table: an empty qualifying set is
/// a valid outcome the target must reflect, never a no-op. Any insert
/// failure surfaces the offending row's ID; the caller's transaction
/// rolls back and the table keeps its prior contents.
///
/// Returns the number of rows inserted.
pub fn replace_all(
    tx: &Transaction<'_>,
    table: &str,
    items: &[FillItem],
) -> Result<usize, SyncError> {
    tx.execute(&format!("DELETE FROM {table}"), [])
        .map_err(|source| SyncError::Transaction { source })?;

    let mut insert = tx
        .prepare(&format!(
            "INSERT INTO {table} \
                 (id, name, device, type, duration, weight, description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))
        .map_err(|source| SyncError::Transaction { source })?;

    for item in items {
        insert
            .execute(params![
                item.id,
                item.name,
                item.device,
                item.item_type,
                item.duration_ticks,
                item.weight,
                item.description,
            ])
            .map_err(|source| SyncError::Write {
                id: item.id,
                source,
            })?;
    }

    Ok(items.len())
}
