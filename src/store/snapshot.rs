//! Export snapshot format.
//!
//! A snapshot is a single JSON document bundling all four collections plus
//! an export timestamp, used for backup and transfer. Import accepts any
//! subset of the collection keys; present keys replace the corresponding
//! collection wholesale, absent keys are left untouched, and the export
//! timestamp is ignored.

use serde::{Deserialize, Serialize};

use crate::models::{Activity, Member, ScheduleEntry, Settings};

/// Full export of a record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub members: Vec<Member>,
    pub activities: Vec<Activity>,
    pub schedules: Vec<ScheduleEntry>,
    pub settings: Settings,
    /// RFC 3339 timestamp of when the export was taken.
    pub export_date: String,
}

impl Snapshot {
    /// Serializes the snapshot as a JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parsed import payload. Every key is optional; only present keys apply.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotDocument {
    pub members: Option<Vec<Member>>,
    pub activities: Option<Vec<Activity>>,
    pub schedules: Option<Vec<ScheduleEntry>>,
    pub settings: Option<Settings>,
}
