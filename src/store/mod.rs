//! Persistent record store.
//!
//! Holds the four collections (members, activities, schedules, settings)
//! in memory and write-through persists the full affected collection on
//! every mutating call, so in-memory and durable state agree the moment a
//! call returns.
//!
//! # Contract
//!
//! The CRUD contract is mirrored per collection: `add_*` assigns a fresh
//! id and type defaults, `update_*` applies a typed patch field by field
//! and answers `Ok(None)` for an unknown id, `delete_*` is a no-op for an
//! unknown id. Bulk overwrite (`replace_*`) backs generation and import.

mod persist;
mod snapshot;

pub use persist::{CollectionKey, JsonFileStorage, MemoryStorage, Storage};
pub use snapshot::Snapshot;

use chrono::{Local, NaiveDate, Utc};

use crate::error::StoreError;
use crate::models::{
    Activity, ActivityDraft, ActivityPatch, Member, MemberDraft, MemberPatch, MemberStatus,
    RecordId, ScheduleDraft, ScheduleEntry, SchedulePatch, Settings,
};
use snapshot::SnapshotDocument;

/// The persistent collections behind roster planning.
pub struct RecordStore {
    storage: Box<dyn Storage>,
    members: Vec<Member>,
    activities: Vec<Activity>,
    schedules: Vec<ScheduleEntry>,
    settings: Settings,
    next_id: RecordId,
}

impl RecordStore {
    /// Opens a store over the given backend, loading whatever documents it
    /// already holds. Absent documents load as empty collections and
    /// default settings; malformed documents are an error.
    pub fn open(storage: impl Storage + 'static) -> Result<Self, StoreError> {
        let mut store = Self {
            storage: Box::new(storage),
            members: Vec::new(),
            activities: Vec::new(),
            schedules: Vec::new(),
            settings: Settings::default(),
            next_id: 1,
        };
        if let Some(doc) = store.storage.read(CollectionKey::Members)? {
            store.members = serde_json::from_str(&doc)?;
        }
        if let Some(doc) = store.storage.read(CollectionKey::Activities)? {
            store.activities = serde_json::from_str(&doc)?;
        }
        if let Some(doc) = store.storage.read(CollectionKey::Schedules)? {
            store.schedules = serde_json::from_str(&doc)?;
        }
        if let Some(doc) = store.storage.read(CollectionKey::Settings)? {
            store.settings = serde_json::from_str(&doc)?;
        }
        store.bump_watermark();
        Ok(store)
    }

    // ======================== members ========================

    /// All members in insertion order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Members eligible for assignment, in insertion order.
    pub fn active_members(&self) -> Vec<&Member> {
        self.members.iter().filter(|m| m.is_active()).collect()
    }

    /// Adds a member with a fresh id, `Active` status, and a zero count.
    pub fn add_member(&mut self, draft: MemberDraft) -> Result<Member, StoreError> {
        let member = Member {
            id: self.allocate_id(),
            name: draft.name,
            email: draft.email,
            status: MemberStatus::Active,
            participation_count: 0,
        };
        self.members.push(member.clone());
        self.persist_members()?;
        Ok(member)
    }

    /// Applies a patch to the member with `id`. `Ok(None)` if absent.
    pub fn update_member(
        &mut self,
        id: RecordId,
        patch: MemberPatch,
    ) -> Result<Option<Member>, StoreError> {
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            member.name = name;
        }
        if let Some(email) = patch.email {
            member.email = Some(email);
        }
        if let Some(status) = patch.status {
            member.status = status;
        }
        let updated = member.clone();
        self.persist_members()?;
        Ok(Some(updated))
    }

    /// Removes the member with `id`. No-op (`Ok(false)`) if absent.
    pub fn delete_member(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        if self.members.len() == before {
            return Ok(false);
        }
        self.persist_members()?;
        Ok(true)
    }

    /// Replaces the whole members collection.
    pub fn replace_members(&mut self, members: Vec<Member>) -> Result<(), StoreError> {
        self.members = members;
        self.bump_watermark();
        self.persist_members()
    }

    /// Overwrites participation counts for the given members and persists
    /// the collection once. Ids not on the roster are ignored.
    pub fn set_participation_counts(
        &mut self,
        counts: &[(RecordId, u32)],
    ) -> Result<(), StoreError> {
        for &(id, count) in counts {
            if let Some(member) = self.members.iter_mut().find(|m| m.id == id) {
                member.participation_count = count;
            }
        }
        self.persist_members()
    }

    // ======================== activities ========================

    /// All activities in insertion order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Adds an activity with a fresh id. Frequency is clamped to at least 1.
    pub fn add_activity(&mut self, draft: ActivityDraft) -> Result<Activity, StoreError> {
        let activity = Activity {
            id: self.allocate_id(),
            name: draft.name,
            description: draft.description,
            frequency: draft.frequency.max(1),
            frequency_unit: draft.frequency_unit,
        };
        self.activities.push(activity.clone());
        self.persist_activities()?;
        Ok(activity)
    }

    /// Applies a patch to the activity with `id`. `Ok(None)` if absent.
    pub fn update_activity(
        &mut self,
        id: RecordId,
        patch: ActivityPatch,
    ) -> Result<Option<Activity>, StoreError> {
        let Some(activity) = self.activities.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            activity.name = name;
        }
        if let Some(description) = patch.description {
            activity.description = Some(description);
        }
        if let Some(frequency) = patch.frequency {
            activity.frequency = frequency.max(1);
        }
        if let Some(unit) = patch.frequency_unit {
            activity.frequency_unit = unit;
        }
        let updated = activity.clone();
        self.persist_activities()?;
        Ok(Some(updated))
    }

    /// Removes the activity with `id`. No-op (`Ok(false)`) if absent.
    /// Existing schedule entries keep their snapshot of it.
    pub fn delete_activity(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        if self.activities.len() == before {
            return Ok(false);
        }
        self.persist_activities()?;
        Ok(true)
    }

    /// Replaces the whole activities collection.
    pub fn replace_activities(&mut self, activities: Vec<Activity>) -> Result<(), StoreError> {
        self.activities = activities;
        self.bump_watermark();
        self.persist_activities()
    }

    // ======================== schedules ========================

    /// All schedule entries in batch order.
    pub fn schedules(&self) -> &[ScheduleEntry] {
        &self.schedules
    }

    /// Adds a single schedule entry with a fresh id.
    pub fn add_schedule(&mut self, draft: ScheduleDraft) -> Result<ScheduleEntry, StoreError> {
        let entry = ScheduleEntry {
            id: self.allocate_id(),
            activity_id: draft.activity_id,
            activity_name: draft.activity_name,
            member_id: draft.member_id,
            member_name: draft.member_name,
            date: draft.date,
            notified: draft.notified,
        };
        self.schedules.push(entry.clone());
        self.persist_schedules()?;
        Ok(entry)
    }

    /// Applies a patch to the entry with `id`. `Ok(None)` if absent.
    pub fn update_schedule(
        &mut self,
        id: RecordId,
        patch: SchedulePatch,
    ) -> Result<Option<ScheduleEntry>, StoreError> {
        let Some(entry) = self.schedules.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(date) = patch.date {
            entry.date = date;
        }
        if let Some(notified) = patch.notified {
            entry.notified = notified;
        }
        let updated = entry.clone();
        self.persist_schedules()?;
        Ok(Some(updated))
    }

    /// Removes the entry with `id`. No-op (`Ok(false)`) if absent.
    pub fn delete_schedule(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let before = self.schedules.len();
        self.schedules.retain(|s| s.id != id);
        if self.schedules.len() == before {
            return Ok(false);
        }
        self.persist_schedules()?;
        Ok(true)
    }

    /// Replaces the whole schedules collection (generation, import).
    pub fn replace_schedules(&mut self, schedules: Vec<ScheduleEntry>) -> Result<(), StoreError> {
        self.schedules = schedules;
        self.bump_watermark();
        self.persist_schedules()
    }

    /// Entries with `start <= date <= end`, in batch order.
    pub fn schedules_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&ScheduleEntry> {
        self.schedules
            .iter()
            .filter(|s| s.date >= start && s.date <= end)
            .collect()
    }

    /// The next `limit` entries on or after the local date, ascending.
    pub fn upcoming_schedules(&self, limit: usize) -> Vec<&ScheduleEntry> {
        self.upcoming_schedules_on(Local::now().date_naive(), limit)
    }

    /// The next `limit` entries on or after `today`, ascending by date.
    /// Entries sharing a date keep their batch order.
    pub fn upcoming_schedules_on(&self, today: NaiveDate, limit: usize) -> Vec<&ScheduleEntry> {
        let mut upcoming: Vec<&ScheduleEntry> =
            self.schedules.iter().filter(|s| s.date >= today).collect();
        upcoming.sort_by_key(|s| s.date);
        upcoming.truncate(limit);
        upcoming
    }

    /// Flips `notified` on the given entries and persists the collection
    /// once. Returns how many entries actually changed.
    pub fn mark_schedules_notified(&mut self, ids: &[RecordId]) -> Result<usize, StoreError> {
        let mut changed = 0;
        for entry in &mut self.schedules {
            if !entry.notified && ids.contains(&entry.id) {
                entry.notified = true;
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist_schedules()?;
        }
        Ok(changed)
    }

    // ======================== settings ========================

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the settings and persists them.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), StoreError> {
        self.settings = settings;
        self.persist_settings()
    }

    // ======================== snapshot / lifecycle ========================

    /// Bundles all four collections into an export snapshot stamped with
    /// the current UTC time.
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            members: self.members.clone(),
            activities: self.activities.clone(),
            schedules: self.schedules.clone(),
            settings: self.settings.clone(),
            export_date: Utc::now().to_rfc3339(),
        }
    }

    /// Applies an export payload. Each collection key present in the
    /// payload replaces that collection wholesale; absent keys are left
    /// untouched. A payload that fails to parse leaves the store
    /// unmodified.
    pub fn import_snapshot(&mut self, json: &str) -> Result<(), StoreError> {
        let doc: SnapshotDocument =
            serde_json::from_str(json).map_err(StoreError::ImportParse)?;
        if let Some(members) = doc.members {
            self.replace_members(members)?;
        }
        if let Some(activities) = doc.activities {
            self.replace_activities(activities)?;
        }
        if let Some(schedules) = doc.schedules {
            self.replace_schedules(schedules)?;
        }
        if let Some(settings) = doc.settings {
            self.set_settings(settings)?;
        }
        tracing::info!("imported snapshot");
        Ok(())
    }

    /// Clears every collection and restores default settings, persisting
    /// all four documents.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.members.clear();
        self.activities.clear();
        self.schedules.clear();
        self.settings = Settings::default();
        self.next_id = 1;
        self.persist_members()?;
        self.persist_activities()?;
        self.persist_schedules()?;
        self.persist_settings()?;
        tracing::info!("store reset to defaults");
        Ok(())
    }

    // ======================== internals ========================

    /// Hands out the next record id.
    pub(crate) fn allocate_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Keeps the id watermark above every id currently stored.
    fn bump_watermark(&mut self) {
        let max_id = self
            .members
            .iter()
            .map(|m| m.id)
            .chain(self.activities.iter().map(|a| a.id))
            .chain(self.schedules.iter().map(|s| s.id))
            .max()
            .unwrap_or(0);
        if self.next_id <= max_id {
            self.next_id = max_id + 1;
        }
    }

    fn persist_members(&mut self) -> Result<(), StoreError> {
        let doc = serde_json::to_string_pretty(&self.members)?;
        self.storage.write(CollectionKey::Members, &doc)?;
        tracing::debug!("saved {} members", self.members.len());
        Ok(())
    }

    fn persist_activities(&mut self) -> Result<(), StoreError> {
        let doc = serde_json::to_string_pretty(&self.activities)?;
        self.storage.write(CollectionKey::Activities, &doc)?;
        tracing::debug!("saved {} activities", self.activities.len());
        Ok(())
    }

    fn persist_schedules(&mut self) -> Result<(), StoreError> {
        let doc = serde_json::to_string_pretty(&self.schedules)?;
        self.storage.write(CollectionKey::Schedules, &doc)?;
        tracing::debug!("saved {} schedule entries", self.schedules.len());
        Ok(())
    }

    fn persist_settings(&mut self) -> Result<(), StoreError> {
        let doc = serde_json::to_string_pretty(&self.settings)?;
        self.storage.write(CollectionKey::Settings, &doc)?;
        tracing::debug!("saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Algorithm, FrequencyUnit};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn memory_store() -> RecordStore {
        RecordStore::open(MemoryStorage::new()).unwrap()
    }

    fn entry(id: RecordId, day: NaiveDate) -> ScheduleEntry {
        ScheduleEntry {
            id,
            activity_id: 1,
            activity_name: "on-call".into(),
            member_id: 2,
            member_name: "Ada".into(),
            date: day,
            notified: false,
        }
    }

    #[test]
    fn test_add_member_defaults() {
        let mut store = memory_store();
        let member = store.add_member(MemberDraft::new("Ada")).unwrap();
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.participation_count, 0);
        assert_eq!(store.members().len(), 1);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut store = memory_store();
        let a = store.add_member(MemberDraft::new("Ada")).unwrap();
        let b = store.add_member(MemberDraft::new("Bo")).unwrap();
        let c = store
            .add_activity(ActivityDraft::new("standup", 1, FrequencyUnit::Days))
            .unwrap();
        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn test_update_member_applies_present_fields_only() {
        let mut store = memory_store();
        let member = store
            .add_member(MemberDraft::new("Ada").with_email("ada@example.com"))
            .unwrap();
        let updated = store
            .update_member(member.id, MemberPatch::new().with_status(MemberStatus::Inactive))
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, MemberStatus::Inactive);
        // Untouched fields survive.
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_update_unknown_id_is_none_not_error() {
        let mut store = memory_store();
        assert!(store
            .update_member(999, MemberPatch::new().with_name("ghost"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_is_noop_when_absent() {
        let mut store = memory_store();
        let member = store.add_member(MemberDraft::new("Ada")).unwrap();
        assert!(store.delete_member(member.id).unwrap());
        assert!(!store.delete_member(member.id).unwrap());
        assert!(store.members().is_empty());
    }

    #[test]
    fn test_active_members_filters_and_keeps_order() {
        let mut store = memory_store();
        let a = store.add_member(MemberDraft::new("Ada")).unwrap();
        let b = store.add_member(MemberDraft::new("Bo")).unwrap();
        let c = store.add_member(MemberDraft::new("Cy")).unwrap();
        store
            .update_member(b.id, MemberPatch::new().with_status(MemberStatus::Inactive))
            .unwrap();
        let active: Vec<RecordId> = store.active_members().iter().map(|m| m.id).collect();
        assert_eq!(active, vec![a.id, c.id]);
    }

    #[test]
    fn test_activity_frequency_clamped() {
        let mut store = memory_store();
        let activity = store
            .add_activity(ActivityDraft::new("standup", 0, FrequencyUnit::Days))
            .unwrap();
        assert_eq!(activity.frequency, 1);
        let patched = store
            .update_activity(activity.id, ActivityPatch::new().with_frequency(0))
            .unwrap()
            .unwrap();
        assert_eq!(patched.frequency, 1);
    }

    #[test]
    fn test_schedules_in_range_inclusive() {
        let mut store = memory_store();
        store
            .replace_schedules(vec![
                entry(1, date(2024, 6, 1)),
                entry(2, date(2024, 6, 5)),
                entry(3, date(2024, 6, 10)),
            ])
            .unwrap();
        let hits = store.schedules_in_range(date(2024, 6, 1), date(2024, 6, 5));
        let ids: Vec<RecordId> = hits.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_upcoming_schedules_sorted_and_truncated() {
        let mut store = memory_store();
        store
            .replace_schedules(vec![
                entry(1, date(2024, 6, 10)),
                entry(2, date(2024, 6, 2)),
                entry(3, date(2024, 5, 1)),
                entry(4, date(2024, 6, 5)),
            ])
            .unwrap();
        let upcoming = store.upcoming_schedules_on(date(2024, 6, 1), 2);
        let ids: Vec<RecordId> = upcoming.iter().map(|e| e.id).collect();
        // Past entry 3 is excluded, the rest ascend by date, cut at limit.
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_mark_notified_persists_once_and_skips_done() {
        let mut store = memory_store();
        let mut done = entry(2, date(2024, 6, 5));
        done.notified = true;
        store
            .replace_schedules(vec![entry(1, date(2024, 6, 5)), done])
            .unwrap();
        let changed = store.mark_schedules_notified(&[1, 2, 99]).unwrap();
        assert_eq!(changed, 1);
        assert!(store.schedules().iter().all(|s| s.notified));
    }

    #[test]
    fn test_write_through_survives_reopen() {
        let dir = std::env::temp_dir().join("rotaplan-test-store-reopen");
        std::fs::remove_dir_all(&dir).ok();
        {
            let mut store = RecordStore::open(JsonFileStorage::new(&dir).unwrap()).unwrap();
            store.add_member(MemberDraft::new("Ada")).unwrap();
            store
                .add_activity(ActivityDraft::new("standup", 1, FrequencyUnit::Days))
                .unwrap();
            store
                .set_settings(Settings {
                    algorithm: Algorithm::Balanced,
                    notification_enabled: false,
                    notification_days: 7,
                })
                .unwrap();
        }
        let mut store = RecordStore::open(JsonFileStorage::new(&dir).unwrap()).unwrap();
        assert_eq!(store.members().len(), 1);
        assert_eq!(store.activities().len(), 1);
        assert_eq!(store.settings().algorithm, Algorithm::Balanced);
        // The reloaded watermark does not reuse stored ids.
        let prior_max = store.members()[0].id.max(store.activities()[0].id);
        let fresh = store.add_member(MemberDraft::new("Bo")).unwrap();
        assert!(fresh.id > prior_max);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = memory_store();
        store.add_member(MemberDraft::new("Ada")).unwrap();
        store
            .add_activity(ActivityDraft::new("standup", 2, FrequencyUnit::Weeks))
            .unwrap();
        store
            .replace_schedules(vec![entry(10, date(2024, 6, 1))])
            .unwrap();

        let snapshot = store.export_snapshot();
        let json = snapshot.to_json().unwrap();

        let mut other = memory_store();
        other.import_snapshot(&json).unwrap();
        assert_eq!(other.members(), store.members());
        assert_eq!(other.activities(), store.activities());
        assert_eq!(other.schedules(), store.schedules());
        assert_eq!(other.settings(), store.settings());
    }

    #[test]
    fn test_partial_import_leaves_absent_keys_untouched() {
        let mut store = memory_store();
        store.add_member(MemberDraft::new("Ada")).unwrap();
        store
            .add_activity(ActivityDraft::new("standup", 1, FrequencyUnit::Days))
            .unwrap();

        store
            .import_snapshot(r#"{"members":[],"exportDate":"2024-06-01T00:00:00Z"}"#)
            .unwrap();
        assert!(store.members().is_empty());
        assert_eq!(store.activities().len(), 1);
    }

    #[test]
    fn test_malformed_import_leaves_store_unmodified() {
        let mut store = memory_store();
        store.add_member(MemberDraft::new("Ada")).unwrap();

        let err = store.import_snapshot("{not json").unwrap_err();
        assert!(matches!(err, StoreError::ImportParse(_)));
        assert_eq!(store.members().len(), 1);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = memory_store();
        store.add_member(MemberDraft::new("Ada")).unwrap();
        store
            .set_settings(Settings {
                algorithm: Algorithm::Random,
                notification_enabled: false,
                notification_days: 9,
            })
            .unwrap();

        store.reset().unwrap();
        assert!(store.members().is_empty());
        assert!(store.activities().is_empty());
        assert!(store.schedules().is_empty());
        assert_eq!(store.settings(), &Settings::default());
    }
}
