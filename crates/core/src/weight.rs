//! Age-based selection weights for catalog fallback entries.
//!
//! Recent content should fill schedule gaps more often than old
//! content, so fallback entries are weighted by age through an ordered
//! tier table. Tier values differ between deployments and are
//! configuration data, not constants.

use serde::{Deserialize, Serialize};

/// One tier of the age-to-weight mapping.
///
/// Tiers are ordered by ascending `max_age_days`; a tier without a
/// bound catches everything older and must come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTier {
    #[serde(default)]
    pub max_age_days: Option<i64>,
    pub weight: i64,
}

/// Resolve the weight for content aged `age_days`.
///
/// The first tier whose bound exceeds the age wins; an unbounded tier
/// always matches. Returns `None` when no tier covers the age.
pub fn weight_for_age(tiers: &[WeightTier], age_days: i64) -> Option<i64> {
    tiers
        .iter()
        .find(|tier| tier.max_age_days.map_or(true, |max| age_days < max))
        .map(|tier| tier.weight)
}
