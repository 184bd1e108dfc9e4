//! Domain types and pure logic for the fill-database sync.
//!
//! This crate has zero internal dependencies so it can be shared by
//! the engine, the daemon, and any future tooling. Everything here is
//! side-effect free: candidate rows in, projected fill items out.
//! Store access lives in `fillsync-engine`.

pub mod error;
pub mod item;
pub mod projection;
pub mod types;
pub mod weight;
