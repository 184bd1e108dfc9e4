//! Synchronization engine for the playout fill databases.
//!
//! Selects candidate rows from the source PostgreSQL database,
//! projects them into the canonical fill-item shape, and atomically
//! replaces the contents of the items table in one or more local
//! SQLite stores, optionally pruning rows with no backing file
//! recorded by the media scanner.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pruner;
pub mod selector;
pub mod writer;
