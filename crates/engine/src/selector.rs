//! Source dataset selection.
//!
//! Two candidate sets come out of the source database: explicit
//! schedule-fill entries, and catalog fallback entries. The fallback
//! query anti-joins against the explicit set, so the two can never
//! share an ID and the merged output needs no deduplication. Both
//! queries run inside one read-only snapshot: the anti-join only
//! holds if the fallback query sees the same `schedule_fill_items`
//! state the explicit query did.

use async_trait::async_trait;
use sqlx::PgPool;

use fillsync_core::item::{Candidate, Provenance};
use fillsync_core::types::{DbId, Timestamp};

use crate::error::SyncError;

/// Read side of a sync job.
///
/// One call yields the merged candidate list for a job; production
/// code uses [`PgFillSource`], tests substitute a canned source. A
/// single call (rather than one per set) lets the implementation
/// scope both fetches to one consistent snapshot.
#[async_trait]
pub trait CandidateSource {
    async fn candidates(&self, include_fallback: bool) -> Result<Vec<Candidate>, SyncError>;
}

/// Explicit schedule-fill entries. Device, type and priority are
/// assigned per entry by the upstream scheduler; the entries are not
/// duration-filtered.
const EXPLICIT_QUERY: &str = "\
    SELECT sfi.video_id AS id, vf.filename, sfi.device, sfi.item_type, \
           EXTRACT(EPOCH FROM vf.duration)::float8 AS duration_secs, \
           sfi.priority \
    FROM schedule_fill_items sfi \
    JOIN video_files vf ON vf.video_id = sfi.video_id \
    JOIN video_file_types vft ON vft.name = vf.video_file_type_name \
    WHERE vft.mode = 'schedule'";

/// Catalog fallback entries: enabled, fill-eligible videos with a
/// positive-duration schedule file, excluding anything already claimed
/// as an explicit entry (NOT EXISTS, so a NULL `video_id` cannot empty
/// the set). Most recent content first, so insertion order favours it
/// if the target ever caps its iteration. The description resolves
/// first-non-empty from show schedule name down to box URL name.
const FALLBACK_QUERY: &str = "\
    SELECT v.id, vf.filename, vft.device, vft.item_type, \
           EXTRACT(EPOCH FROM vf.duration)::float8 AS duration_secs, \
           v.created_at, \
           COALESCE(\
               NULLIF(sh.schedule_name, ''), \
               NULLIF(b.display_name, ''), \
               NULLIF(b.name, ''), \
               NULLIF(b.url_name, ''), \
               '') AS description \
    FROM videos v \
    JOIN video_files vf ON vf.video_id = v.id \
    JOIN video_file_types vft ON vft.name = vf.video_file_type_name \
    LEFT JOIN video_boxes b ON b.id = v.video_box_id \
    LEFT JOIN shows sh ON sh.id = b.show_id \
    WHERE vft.mode = 'schedule' \
      AND vf.duration > INTERVAL '0 seconds' \
      AND v.enabled \
      AND v.fill_eligible \
      AND NOT EXISTS (\
          SELECT 1 FROM schedule_fill_items sfi WHERE sfi.video_id = v.id) \
    ORDER BY v.created_at DESC";

/// Row shape of [`EXPLICIT_QUERY`].
#[derive(sqlx::FromRow)]
struct ExplicitRow {
    id: DbId,
    filename: String,
    device: String,
    item_type: String,
    duration_secs: Option<f64>,
    priority: i32,
}

/// Row shape of [`FALLBACK_QUERY`].
#[derive(sqlx::FromRow)]
struct FallbackRow {
    id: DbId,
    filename: String,
    device: String,
    item_type: String,
    duration_secs: Option<f64>,
    created_at: Timestamp,
    description: String,
}

impl From<ExplicitRow> for Candidate {
    fn from(row: ExplicitRow) -> Self {
        Candidate {
            id: row.id,
            raw_name: row.filename,
            device: row.device,
            item_type: row.item_type,
            duration_secs: row.duration_secs,
            provenance: Provenance::Explicit {
                priority: i64::from(row.priority),
            },
        }
    }
}

impl From<FallbackRow> for Candidate {
    fn from(row: FallbackRow) -> Self {
        Candidate {
            id: row.id,
            raw_name: row.filename,
            device: row.device,
            item_type: row.item_type,
            duration_secs: row.duration_secs,
            provenance: Provenance::Fallback {
                created_at: row.created_at,
                description: row.description,
            },
        }
    }
}

/// Candidate source backed by the production PostgreSQL database.
pub struct PgFillSource {
    pool: PgPool,
}

impl PgFillSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateSource for PgFillSource {
    async fn candidates(&self, include_fallback: bool) -> Result<Vec<Candidate>, SyncError> {
        let mut tx = self.pool.begin().await?;

        // READ COMMITTED takes a fresh snapshot per statement, which
        // would let the anti-join re-evaluate against state the
        // explicit query never saw. REPEATABLE READ pins one snapshot
        // for both fetches.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let explicit: Vec<ExplicitRow> = sqlx::query_as(EXPLICIT_QUERY)
            .fetch_all(&mut *tx)
            .await?;
        let mut candidates: Vec<Candidate> =
            explicit.into_iter().map(Candidate::from).collect();

        if include_fallback {
            let fallback: Vec<FallbackRow> = sqlx::query_as(FALLBACK_QUERY)
                .fetch_all(&mut *tx)
                .await?;
            candidates.extend(fallback.into_iter().map(Candidate::from));
        }

        tx.commit().await?;
        Ok(candidates)
    }
}
