//! Cross-store pruning against the media scanner's file list.
//!
//! The scanner maintains a SQLite database with a `files` table of
//! every clip it has seen on disk. A fill item whose name has no entry
//! there points at media the playout server cannot load, so it is
//! removed before commit.

use std::path::Path;

use rusqlite::{params, Connection, Transaction};

use crate::error::SyncError;

/// Schema alias the reference store is attached under.
const REFERENCE_SCHEMA: &str = "fileref";

/// Attach the reference store for the duration of one run.
///
/// SQLite refuses ATTACH inside a transaction, so the attach/detach
/// pair brackets the replace transaction; the join statement itself
/// runs within it. The reference store is only ever read.
pub fn attach_reference(conn: &Connection, path: &Path) -> Result<(), SyncError> {
    let path_text = path.to_string_lossy().into_owned();
    conn.execute(
        &format!("ATTACH DATABASE ?1 AS {REFERENCE_SCHEMA}"),
        params![path_text],
    )
    .map(|_| ())
    .map_err(|source| SyncError::Prune { source })
}

/// Detach the reference store. Companion to [`attach_reference`]; must
/// run on every exit path once the transaction has resolved.
pub fn detach_reference(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(&format!("DETACH DATABASE {REFERENCE_SCHEMA}"), [])
        .map(|_| ())
}

/// Delete every row whose name has no corroborating file record.
///
/// NOT EXISTS rather than NOT IN: a NULL filename in the reference
/// table must not suppress the whole delete. Returns rows removed.
pub fn prune_missing(tx: &Transaction<'_>, table: &str) -> Result<usize, SyncError> {
    tx.execute(
        &format!(
            "DELETE FROM {table} WHERE NOT EXISTS (\
                 SELECT 1 FROM {REFERENCE_SCHEMA}.files \
                 WHERE {REFERENCE_SCHEMA}.files.filename = {table}.name)"
        ),
        [],
    )
    .map_err(|source| SyncError::Prune { source })
}
