//! Statement severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity label attached to a statement configuration.
///
/// Severity is informational: it never changes how a statement is evaluated.
/// It only matters when the caller aggregates with
/// [`AggregationRule::AtLeast`](super::AggregationRule::AtLeast) or raises on
/// a finished report with
/// [`ValidationReport::raise_for`](super::ValidationReport::raise_for).
///
/// Levels are ordered: Critical > Error > Warning > Info.
///
/// # Examples
///
/// ```rust
/// use term_assay::core::Level;
///
/// assert!(Level::Critical > Level::Error);
/// assert!(Level::Warning.is_at_least(Level::Info));
/// assert_eq!(Level::default(), Level::Warning);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Observations and profiling metrics
    Info = 0,
    /// Issues that should be reviewed but don't block consumption
    #[default]
    Warning = 1,
    /// Data quality issues that must be addressed
    Error = 2,
    /// Defects that make the data unusable downstream
    Critical = 3,
}

impl Level {
    /// Returns the string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }

    /// Checks if this level is at least as severe as another level.
    pub fn is_at_least(&self, other: Level) -> bool {
        *self >= other
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
