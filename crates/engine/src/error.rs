//! Error taxonomy for a sync run.
//!
//! Every failure mode maps onto the stage of the per-job state machine
//! it occurred in, so reports can say both what broke and where. A
//! failed job always leaves the target table with its pre-run contents.

use std::path::PathBuf;

use fillsync_core::error::ProjectionError;
use fillsync_core::types::DbId;

/// Stage of the per-job state machine in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    SourceRead,
    Project,
    Replace,
    Prune,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SyncStage::SourceRead => "source-read",
            SyncStage::Project => "project",
            SyncStage::Replace => "replace",
            SyncStage::Prune => "prune",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Source read or connectivity failure. The job aborts before any
    /// destination write begins.
    #[error("source query failed: {0}")]
    SourceQuery(#[from] sqlx::Error),

    /// A candidate row could not be projected under the abort policy.
    #[error("row {id} could not be projected: {source}")]
    Projection {
        id: DbId,
        #[source]
        source: ProjectionError,
    },

    /// The target store could not be opened or its schema prepared.
    #[error("target store {}: {source}", path.display())]
    Target {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The replace transaction could not be opened or committed.
    #[error("replace transaction failed: {source}")]
    Transaction {
        #[source]
        source: rusqlite::Error,
    },

    /// A row insert inside the replace transaction failed; the whole
    /// transaction rolls back.
    #[error("write of row {id} failed: {source}")]
    Write {
        id: DbId,
        #[source]
        source: rusqlite::Error,
    },

    /// Reference-store attach or prune join failed. Pruning shares the
    /// replace transaction, so the replace rolls back with it.
    #[error("prune against reference store failed: {source}")]
    Prune {
        #[source]
        source: rusqlite::Error,
    },
}

impl SyncError {
    /// The state-machine stage this error belongs to.
    pub fn stage(&self) -> SyncStage {
        match self {
            SyncError::SourceQuery(_) => SyncStage::SourceRead,
            SyncError::Projection { .. } => SyncStage::Project,
            SyncError::Target { .. } | SyncError::Transaction { .. } | SyncError::Write { .. } => {
                SyncStage::Replace
            }
            SyncError::Prune { .. } => SyncStage::Prune,
        }
    }
}

/// Errors loading or validating the job configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read job file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse job file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("job {job:?}: {reason}")]
    Invalid { job: String, reason: String },
}
