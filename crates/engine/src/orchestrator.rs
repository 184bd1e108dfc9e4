//! Per-job sync sequencing and cross-job isolation.
//!
//! Each job runs the same strictly sequential pipeline with no
//! retries: source read, project, replace, optional prune, commit.
//! Jobs are independent; one job failing neither blocks nor rolls back
//! another that has already committed.

use chrono::Utc;
use rusqlite::Connection;

use fillsync_core::item::{project, Candidate, FillItem};

use crate::config::{JobConfig, MalformedRowPolicy};
use crate::error::{SyncError, SyncStage};
use crate::pruner;
use crate::selector::CandidateSource;
use crate::writer;

/// Outcome of one sync job.
#[derive(Debug)]
pub struct JobReport {
    pub job: String,
    pub outcome: JobOutcome,
}

#[derive(Debug)]
pub enum JobOutcome {
    /// The replace (and prune, when configured) committed.
    Committed { rows: usize, pruned: usize },
    /// The job failed in `stage`; its target table kept its pre-run
    /// contents.
    Failed { stage: SyncStage, error: SyncError },
}

impl JobOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, JobOutcome::Committed { .. })
    }
}

/// Run every configured job once, sequentially.
pub async fn run_all<S>(source: &S, jobs: &[JobConfig]) -> Vec<JobReport>
where
    S: CandidateSource + Sync,
{
    let mut reports = Vec::with_capacity(jobs.len());
    for job in jobs {
        let outcome = match run_job(source, job).await {
            Ok((rows, pruned)) => {
                tracing::info!(job = %job.name, rows, pruned, "sync job committed");
                JobOutcome::Committed { rows, pruned }
            }
            Err(error) => {
                let stage = error.stage();
                tracing::error!(job = %job.name, %stage, %error, "sync job failed");
                JobOutcome::Failed { stage, error }
            }
        };
        reports.push(JobReport {
            job: job.name.clone(),
            outcome,
        });
    }
    reports
}

/// Run one job end to end. Returns (rows written, rows pruned).
pub async fn run_job<S>(source: &S, job: &JobConfig) -> Result<(usize, usize), SyncError>
where
    S: CandidateSource + Sync,
{
    let candidates = source.candidates(job.include_fallback).await?;
    let items = project_candidates(job, &candidates)?;
    apply_to_target(job, &items)
}

/// Project the selected candidates under the job's policies.
fn project_candidates(
    job: &JobConfig,
    candidates: &[Candidate],
) -> Result<Vec<FillItem>, SyncError> {
    let now = Utc::now();
    let mut items = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match project(candidate, &job.weight_tiers, job.strip, now) {
            Ok(item) => items.push(item),
            Err(source) => match job.on_malformed {
                MalformedRowPolicy::Abort => {
                    return Err(SyncError::Projection {
                        id: candidate.id,
                        source,
                    });
                }
                MalformedRowPolicy::Skip => {
                    tracing::warn!(
                        job = %job.name,
                        id = candidate.id,
                        error = %source,
                        "dropping malformed candidate row"
                    );
                }
            },
        }
    }
    Ok(items)
}

/// Replace-then-prune against one target store, atomically.
///
/// Public so store-level behavior is testable without a source
/// database. Returns (rows written, rows pruned).
pub fn apply_to_target(job: &JobConfig, items: &[FillItem]) -> Result<(usize, usize), SyncError> {
    let mut conn = Connection::open(&job.target_db).map_err(|source| SyncError::Target {
        path: job.target_db.clone(),
        source,
    })?;
    writer::ensure_table(&conn, &job.table).map_err(|source| SyncError::Target {
        path: job.target_db.clone(),
        source,
    })?;

    let prune = match &job.reference_db {
        Some(reference) => {
            pruner::attach_reference(&conn, reference)?;
            true
        }
        None => false,
    };

    let result = replace_and_prune(&mut conn, job, items, prune);

    if prune {
        // The transaction has already committed or rolled back at this
        // point; a failed detach cannot affect the table contents.
        if let Err(error) = pruner::detach_reference(&conn) {
            tracing::warn!(job = %job.name, %error, "failed to detach reference store");
        }
    }

    result
}

fn replace_and_prune(
    conn: &mut Connection,
    job: &JobConfig,
    items: &[FillItem],
    prune: bool,
) -> Result<(usize, usize), SyncError> {
    // Dropping the transaction on any error path rolls it back.
    let tx = conn
        .transaction()
        .map_err(|source| SyncError::Transaction { source })?;

    let rows = writer::replace_all(&tx, &job.table, items)?;
    let pruned = if prune {
        pruner::prune_missing(&tx, &job.table)?
    } else {
        0
    };

    tx.commit()
        .map_err(|source| SyncError::Transaction { source })?;

    Ok((rows, pruned))
}
