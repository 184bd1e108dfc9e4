//! Filename strip policies and duration conversion.
//!
//! Stored filenames carry a fixed storage-path prefix that must never
//! reach the playout device, and the downstream scheduler counts time
//! in frames rather than seconds.

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Frame rate of the downstream scheduler, in ticks per second.
pub const TICKS_PER_SECOND: f64 = 25.0;

/// How a stored filename is reduced to a playout display name.
///
/// Deployments disagree on the rule, so it is selected per job rather
/// than hard-coded:
///
/// - `prefix`: drop a fixed-length storage prefix, then drop the
///   extension after the final `.`.
/// - `prefix_suffix`: drop fixed-length runs from both ends, with no
///   extension handling (the older `length - 12` deployments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StripPolicy {
    Prefix { prefix_len: usize },
    PrefixSuffix { prefix_len: usize, suffix_len: usize },
}

impl Default for StripPolicy {
    /// The current deployments store files under an 8-character prefix.
    fn default() -> Self {
        StripPolicy::Prefix { prefix_len: 8 }
    }
}

/// Project a stored filename to its upper-cased display name.
///
/// A filename shorter than the strip window, or one that strips down
/// to nothing, is malformed input and never becomes a row.
pub fn project_name(raw: &str, policy: StripPolicy) -> Result<String, ProjectionError> {
    let stripped: String = match policy {
        StripPolicy::Prefix { prefix_len } => {
            if raw.chars().count() < prefix_len {
                return Err(ProjectionError::FilenameTooShort {
                    filename: raw.to_string(),
                    min_len: prefix_len,
                });
            }
            let rest: String = raw.chars().skip(prefix_len).collect();
            match rest.rfind('.') {
                Some(dot) => rest[..dot].to_string(),
                None => rest,
            }
        }
        StripPolicy::PrefixSuffix {
            prefix_len,
            suffix_len,
        } => {
            let total = raw.chars().count();
            if total <= prefix_len + suffix_len {
                return Err(ProjectionError::FilenameTooShort {
                    filename: raw.to_string(),
                    min_len: prefix_len + suffix_len,
                });
            }
            raw.chars()
                .skip(prefix_len)
                .take(total - prefix_len - suffix_len)
                .collect()
        }
    };

    if stripped.is_empty() {
        return Err(ProjectionError::EmptyName {
            filename: raw.to_string(),
        });
    }

    Ok(stripped.to_uppercase())
}

/// Convert a duration in seconds to scheduler ticks, flooring.
///
/// Truncation is deliberate: a fill item must never be reported longer
/// than the media actually runs.
pub fn duration_ticks(seconds: f64) -> Result<i64, ProjectionError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ProjectionError::InvalidDuration { seconds });
    }
    Ok((seconds * TICKS_PER_SECOND).floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_strip_and_uppercase() {
        assert_eq!(
            project_name("ABCDEFGHmovie.mp4", StripPolicy::default()).unwrap(),
            "MOVIE"
        );
    }

    #[test]
    fn prefix_strip_without_extension() {
        assert_eq!(
            project_name("ABCDEFGHident", StripPolicy::default()).unwrap(),
            "IDENT"
        );
    }

    #[test]
    fn only_last_extension_is_dropped() {
        assert_eq!(
            project_name("ABCDEFGHshow.part1.mov", StripPolicy::default()).unwrap(),
            "SHOW.PART1"
        );
    }

    #[test]
    fn filename_shorter_than_prefix_is_rejected() {
        let err = project_name("short", StripPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::FilenameTooShort { min_len: 8, .. }
        ));
    }

    #[test]
    fn prefix_plus_bare_extension_is_rejected() {
        let err = project_name("ABCDEFGH.mp4", StripPolicy::default()).unwrap_err();
        assert!(matches!(err, ProjectionError::EmptyName { .. }));
    }

    #[test]
    fn prefix_suffix_strips_both_ends() {
        let policy = StripPolicy::PrefixSuffix {
            prefix_len: 8,
            suffix_len: 4,
        };
        assert_eq!(project_name("ABCDEFGHmovie.mp4", policy).unwrap(), "MOVIE");
    }

    #[test]
    fn prefix_suffix_too_short_is_rejected() {
        let policy = StripPolicy::PrefixSuffix {
            prefix_len: 8,
            suffix_len: 4,
        };
        let err = project_name("ABCDEFGH.mp4", policy).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::FilenameTooShort { min_len: 12, .. }
        ));
    }

    #[test]
    fn duration_floors_not_rounds() {
        assert_eq!(duration_ticks(90.4).unwrap(), 2260);
        assert_eq!(duration_ticks(90.99).unwrap(), 2274);
    }

    #[test]
    fn duration_zero_is_valid() {
        assert_eq!(duration_ticks(0.0).unwrap(), 0);
    }

    #[test]
    fn duration_exact_for_a_full_day() {
        // 24 hours at 25 ticks/s stays well inside f64's exact-integer range.
        assert_eq!(duration_ticks(86_400.0).unwrap(), 2_160_000);
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert!(matches!(
            duration_ticks(-1.0),
            Err(ProjectionError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn nan_duration_is_rejected() {
        assert!(matches!(
            duration_ticks(f64::NAN),
            Err(ProjectionError::InvalidDuration { .. })
        ));
    }
}
