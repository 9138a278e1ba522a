//! Recurring activity model.
//!
//! An activity is a duty that recurs on a fixed cadence: every N days,
//! weeks, or months. Occurrence dates are produced by stepping from a
//! window's start date with [`Activity::next_occurrence`].
//!
//! # Month Stepping
//!
//! Month steps keep the day-of-month and roll overflow into the following
//! month, matching plain calendar addition rather than end-of-month
//! clamping: 2024-01-31 plus one month is 2024-03-02 (Feb 2024 has 29
//! days), not 2024-02-29.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A recurring duty to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique activity identifier. Immutable after creation.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Free-form description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cadence multiplier. Always at least 1.
    pub frequency: u32,
    /// Cadence unit.
    pub frequency_unit: FrequencyUnit,
}

/// Unit of an activity's recurrence cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Days,
    Weeks,
    Months,
}

impl Activity {
    /// Returns the occurrence date following `date` on this cadence.
    ///
    /// `None` only when the step leaves chrono's representable range,
    /// which terminates occurrence generation for this activity.
    pub fn next_occurrence(&self, date: NaiveDate) -> Option<NaiveDate> {
        let step = self.frequency.max(1);
        match self.frequency_unit {
            FrequencyUnit::Days => date.checked_add_days(Days::new(u64::from(step))),
            FrequencyUnit::Weeks => date.checked_add_days(Days::new(u64::from(step) * 7)),
            FrequencyUnit::Months => add_months_rollover(date, step),
        }
    }
}

/// Calendar month addition with day-of-month rollover.
///
/// Anchors at the first of the target month and walks forward `day - 1`
/// days, so a day past the target month's end spills into the next month.
fn add_months_rollover(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(u64::from(date.day() - 1)))
}

/// Field values for creating an activity.
///
/// Frequency is clamped to at least 1 when the record is stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    /// Display name.
    pub name: String,
    /// Free-form description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Cadence multiplier.
    pub frequency: u32,
    /// Cadence unit.
    pub frequency_unit: FrequencyUnit,
}

impl ActivityDraft {
    /// Creates a draft with the given name and cadence.
    pub fn new(name: impl Into<String>, frequency: u32, unit: FrequencyUnit) -> Self {
        Self {
            name: name.into(),
            description: None,
            frequency,
            frequency_unit: unit,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for an activity. Absent fields leave the record untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub frequency_unit: Option<FrequencyUnit>,
}

impl ActivityPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the cadence multiplier.
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the cadence unit.
    pub fn with_frequency_unit(mut self, unit: FrequencyUnit) -> Self {
        self.frequency_unit = Some(unit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn activity(frequency: u32, unit: FrequencyUnit) -> Activity {
        Activity {
            id: 1,
            name: "standup".into(),
            description: None,
            frequency,
            frequency_unit: unit,
        }
    }

    #[test]
    fn test_day_stepping() {
        let act = activity(3, FrequencyUnit::Days);
        assert_eq!(
            act.next_occurrence(date(2024, 1, 30)),
            Some(date(2024, 2, 2))
        );
    }

    #[test]
    fn test_week_stepping() {
        let act = activity(2, FrequencyUnit::Weeks);
        assert_eq!(
            act.next_occurrence(date(2024, 1, 1)),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn test_month_stepping_plain() {
        let act = activity(1, FrequencyUnit::Months);
        assert_eq!(
            act.next_occurrence(date(2024, 3, 15)),
            Some(date(2024, 4, 15))
        );
    }

    #[test]
    fn test_month_stepping_rolls_over_short_months() {
        let act = activity(1, FrequencyUnit::Months);
        // Jan 31 + 1 month lands past Feb 29 and rolls into March.
        assert_eq!(
            act.next_occurrence(date(2024, 1, 31)),
            Some(date(2024, 3, 2))
        );
        // Non-leap year: rolls one day further.
        assert_eq!(
            act.next_occurrence(date(2023, 1, 31)),
            Some(date(2023, 3, 3))
        );
    }

    #[test]
    fn test_month_stepping_across_year_boundary() {
        let act = activity(2, FrequencyUnit::Months);
        assert_eq!(
            act.next_occurrence(date(2024, 11, 30)),
            Some(date(2025, 1, 30))
        );
    }

    #[test]
    fn test_zero_frequency_clamped_to_one() {
        let act = activity(0, FrequencyUnit::Days);
        assert_eq!(
            act.next_occurrence(date(2024, 1, 1)),
            Some(date(2024, 1, 2))
        );
    }

    #[test]
    fn test_frequency_unit_serialized_lowercase() {
        let json = serde_json::to_value(FrequencyUnit::Weeks).unwrap();
        assert_eq!(json, "weeks");
        let act = activity(2, FrequencyUnit::Months);
        let json = serde_json::to_value(&act).unwrap();
        assert_eq!(json["frequencyUnit"], "months");
    }
}
