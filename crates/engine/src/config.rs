//! Sync job configuration.
//!
//! One job pairs the shared source selection with one target SQLite
//! store. The job list is a JSON file loaded once at startup; business
//! constants that drift between deployments (weight tiers, strip
//! policy, table name) live here rather than in code.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use fillsync_core::projection::StripPolicy;
use fillsync_core::weight::WeightTier;

use crate::error::ConfigError;

/// Default target table name.
pub const DEFAULT_TABLE: &str = "items";

/// What to do with a candidate row that fails projection.
///
/// Silently dropping rows changes the output set, so the choice is
/// explicit per job and defaults to failing the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Fail the whole job on the first malformed row.
    #[default]
    Abort,
    /// Drop the offending row and log it at WARN.
    Skip,
}

/// Top-level shape of the job file.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub jobs: Vec<JobConfig>,
}

/// One configured sync job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub name: String,
    /// Path of the target fill database.
    pub target_db: PathBuf,
    /// Path of the media scanner's file-list database. Setting this
    /// enables pruning; omitting it disables it.
    #[serde(default)]
    pub reference_db: Option<PathBuf>,
    #[serde(default = "default_table")]
    pub table: String,
    /// Age-to-weight tiers for fallback entries. Required whenever
    /// fallback entries are included; there is no canonical default.
    #[serde(default)]
    pub weight_tiers: Vec<WeightTier>,
    /// Merge catalog fallback entries with the explicit set, or sync
    /// the explicit set alone.
    #[serde(default = "default_true")]
    pub include_fallback: bool,
    #[serde(default)]
    pub strip: StripPolicy,
    #[serde(default)]
    pub on_malformed: MalformedRowPolicy,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_true() -> bool {
    true
}

impl SyncConfig {
    /// Load and validate the job file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SyncConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        for job in &config.jobs {
            job.validate()?;
        }
        Ok(config)
    }
}

impl JobConfig {
    /// Check the cross-field constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(self.invalid("job name is empty"));
        }
        if !is_identifier(&self.table) {
            return Err(self.invalid(format!(
                "table {:?} is not a bare SQL identifier",
                self.table
            )));
        }
        if self.include_fallback && self.weight_tiers.is_empty() {
            return Err(self.invalid("fallback entries need at least one weight tier"));
        }

        let mut previous_bound: Option<i64> = None;
        for (index, tier) in self.weight_tiers.iter().enumerate() {
            match tier.max_age_days {
                Some(max) => {
                    if max <= 0 {
                        return Err(self.invalid("weight tier age bounds must be positive"));
                    }
                    if let Some(previous) = previous_bound {
                        if max <= previous {
                            return Err(self.invalid(
                                "weight tier age bounds must be strictly ascending",
                            ));
                        }
                    }
                    previous_bound = Some(max);
                }
                None => {
                    if index + 1 != self.weight_tiers.len() {
                        return Err(self.invalid("the unbounded weight tier must come last"));
                    }
                }
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::Invalid {
            job: self.name.clone(),
            reason: reason.into(),
        }
    }
}

/// Table names cannot be bound as SQL parameters, so only bare
/// identifiers are accepted into statement text.
fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
