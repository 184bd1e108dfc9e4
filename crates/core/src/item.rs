//! Candidate records and their projection into fill items.

use crate::error::ProjectionError;
use crate::projection::{duration_ticks, project_name, StripPolicy};
use crate::types::{DbId, Timestamp};
use crate::weight::{weight_for_age, WeightTier};

/// Where a candidate came from, and the weight inputs that implies.
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    /// Explicitly assigned to scheduled fill upstream; the weight is
    /// the externally supplied priority, passed through unchanged.
    Explicit { priority: i64 },
    /// General catalog entry; the weight is derived from content age
    /// at projection time via the job's tier table.
    Fallback {
        created_at: Timestamp,
        description: String,
    },
}

/// A source record selected for sync, before projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: DbId,
    /// Stored filename, still carrying the storage-path prefix.
    pub raw_name: String,
    pub device: String,
    pub item_type: String,
    /// Absent only for explicit entries, which are not duration-filtered.
    pub duration_secs: Option<f64>,
    pub provenance: Provenance,
}

/// One row of the target fill items table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillItem {
    pub id: DbId,
    pub name: String,
    pub device: String,
    pub item_type: String,
    pub duration_ticks: i64,
    pub weight: i64,
    pub description: String,
}

/// Project one candidate into a fill item.
///
/// `now` is passed in rather than read from the clock so age-based
/// weights are deterministic under test.
pub fn project(
    candidate: &Candidate,
    tiers: &[WeightTier],
    strip: StripPolicy,
    now: Timestamp,
) -> Result<FillItem, ProjectionError> {
    let name = project_name(&candidate.raw_name, strip)?;

    // Explicit entries may lack a duration; they project to zero ticks
    // so the scheduler treats them as instantaneous rather than broken.
    let ticks = match candidate.duration_secs {
        Some(seconds) => duration_ticks(seconds)?,
        None => 0,
    };

    let (weight, description) = match &candidate.provenance {
        Provenance::Explicit { priority } => (*priority, String::new()),
        Provenance::Fallback {
            created_at,
            description,
        } => {
            let age_days = (now - *created_at).num_days();
            let weight = weight_for_age(tiers, age_days)
                .ok_or(ProjectionError::NoWeightTier { age_days })?;
            (weight, description.clone())
        }
    };

    Ok(FillItem {
        id: candidate.id,
        name,
        device: candidate.device.clone(),
        item_type: candidate.item_type.clone(),
        duration_ticks: ticks,
        weight,
        description,
    })
}
