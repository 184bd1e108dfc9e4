//! Shared fixtures for the store-level integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

use fillsync_core::item::FillItem;
use fillsync_core::projection::StripPolicy;
use fillsync_engine::config::{JobConfig, MalformedRowPolicy};

/// A minimal explicit-only job writing into `dir`.
pub fn job(dir: &TempDir, name: &str) -> JobConfig {
    JobConfig {
        name: name.to_string(),
        target_db: dir.path().join(format!("{name}.db")),
        reference_db: None,
        table: "items".to_string(),
        weight_tiers: Vec::new(),
        include_fallback: false,
        strip: StripPolicy::default(),
        on_malformed: MalformedRowPolicy::Abort,
    }
}

/// An already-projected fill item with fixed device/type/duration.
pub fn item(id: i64, name: &str) -> FillItem {
    FillItem {
        id,
        name: name.to_string(),
        device: "caspar-1".to_string(),
        item_type: "trailer".to_string(),
        duration_ticks: 2500,
        weight: 1,
        description: String::new(),
    }
}

/// IDs currently in the `items` table, ascending.
pub fn item_ids(path: &Path) -> Vec<i64> {
    let conn = Connection::open(path).expect("target should open");
    let mut stmt = conn
        .prepare("SELECT id FROM items ORDER BY id")
        .expect("items table should exist");
    stmt.query_map([], |row| row.get(0))
        .expect("query should run")
        .collect::<Result<Vec<i64>, _>>()
        .expect("rows should read")
}

/// Names currently in the `items` table, ascending.
pub fn item_names(path: &Path) -> Vec<String> {
    let conn = Connection::open(path).expect("target should open");
    let mut stmt = conn
        .prepare("SELECT name FROM items ORDER BY name")
        .expect("items table should exist");
    stmt.query_map([], |row| row.get(0))
        .expect("query should run")
        .collect::<Result<Vec<String>, _>>()
        .expect("rows should read")
}

/// Full contents of the `items` table, ascending by ID.
pub fn all_rows(path: &Path) -> Vec<(i64, String, String, String, i64, i64, String)> {
    let conn = Connection::open(path).expect("target should open");
    let mut stmt = conn
        .prepare(
            "SELECT id, name, device, type, duration, weight, description \
             FROM items ORDER BY id",
        )
        .expect("items table should exist");
    stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    })
    .expect("query should run")
    .collect::<Result<Vec<_>, _>>()
    .expect("rows should read")
}

/// Build a reference store shaped like the media scanner's file list.
pub fn reference_db(dir: &TempDir, filenames: &[&str]) -> PathBuf {
    let path = dir.path().join("files.db");
    let conn = Connection::open(&path).expect("reference store should open");
    conn.execute_batch(
        "CREATE TABLE files (\
             filename TEXT PRIMARY KEY, \
             filesize INTEGER, \
             duration INTEGER, \
             missing INTEGER, \
             changed INTEGER, \
             lastupdate INTEGER)",
    )
    .expect("files table should create");
    for name in filenames {
        conn.execute(
            "INSERT INTO files (filename) VALUES (?1)",
            rusqlite::params![name],
        )
        .expect("filename should insert");
    }
    path
}
