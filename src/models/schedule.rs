//! Schedule entry model.
//!
//! One entry is one occurrence of an activity on a calendar date with
//! exactly one assigned member. Entries exist only as a full batch: every
//! generation run replaces the whole collection.
//!
//! # Name Snapshots
//!
//! `activity_name` and `member_name` are values captured at generation
//! time, not live references. Editing or deleting the source activity or
//! member later does not resynchronize existing entries; the plan keeps
//! showing the names that were current when it was generated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// One planned occurrence: an activity, a date, and an assigned member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Unique entry identifier.
    pub id: RecordId,
    /// Source activity id. May outlive the activity itself.
    pub activity_id: RecordId,
    /// Activity name captured at generation time.
    pub activity_name: String,
    /// Assigned member id.
    pub member_id: RecordId,
    /// Member name captured at generation time.
    pub member_name: String,
    /// Occurrence date (no time component).
    pub date: NaiveDate,
    /// Whether a reminder has fired for this entry.
    pub notified: bool,
}

/// Field values for creating a schedule entry directly.
///
/// Generation builds entries itself; this draft exists so the schedules
/// collection carries the same add contract as members and activities.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    pub activity_id: RecordId,
    pub activity_name: String,
    pub member_id: RecordId,
    pub member_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notified: bool,
}

/// Partial update for a schedule entry.
///
/// Only the occurrence date and the notified flag are patchable; slot
/// reassignment happens by regenerating the plan.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notified: Option<bool>,
}

impl SchedulePatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the occurrence date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the notified flag.
    pub fn with_notified(mut self, notified: bool) -> Self {
        self.notified = Some(notified);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialized_form() {
        let entry = ScheduleEntry {
            id: 10,
            activity_id: 2,
            activity_name: "on-call".into(),
            member_id: 5,
            member_name: "Ada".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            notified: false,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["activityId"], 2);
        assert_eq!(json["memberName"], "Ada");
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["notified"], false);
    }

    #[test]
    fn test_draft_notified_defaults_false() {
        let draft: ScheduleDraft = serde_json::from_str(
            r#"{"activityId":1,"activityName":"x","memberId":2,"memberName":"y","date":"2024-06-01"}"#,
        )
        .unwrap();
        assert!(!draft.notified);
    }
}
