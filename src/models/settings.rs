//! Planner settings.
//!
//! Settings persist across generation runs and take effect on the next
//! generation or notification cycle, never retroactively.

use serde::{Deserialize, Serialize};

/// Behavioral settings for generation and reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Assignment policy used by the next generation run.
    pub algorithm: Algorithm,
    /// Whether reminder scans fire at all.
    pub notification_enabled: bool,
    /// Lead time: days before an occurrence at which the reminder fires.
    pub notification_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Rotation,
            notification_enabled: true,
            notification_days: 3,
        }
    }
}

/// Assignment policy selector.
///
/// Documents written by other tooling may carry a policy name this crate
/// does not know; such values deserialize to [`Algorithm::Unknown`], which
/// generation treats as a plain first-member pick rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Cycle through the roster in count-sorted order.
    Rotation,
    /// Uniform random pick per occurrence.
    Random,
    /// Always pick the member with the fewest assignments so far.
    Balanced,
    /// Unrecognized policy name; degrades to picking the first member.
    #[serde(other)]
    Unknown,
}
