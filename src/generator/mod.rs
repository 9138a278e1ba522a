//! Duty schedule generation.
//!
//! # Algorithm
//!
//! 1. Validate the window and the preconditions (active members,
//!    activities) before touching stored state.
//! 2. Discard the previous schedule batch.
//! 3. Per activity, step occurrence dates across the window and assign a
//!    member per the configured policy, sharing live participation counts
//!    across all activities in the run.
//! 4. Persist the new batch and the updated member counts.
//!
//! # Fairness Bookkeeping
//!
//! Counts reset to zero for every active member at the start of a run.
//! Each assignment increments the assigned member's count immediately, so
//! activities scheduled later in the run see the load produced by earlier
//! ones. That cross-activity coupling is what lets the balanced policy
//! even out load over the whole plan rather than per activity.

pub mod policy;

pub use policy::{policy_for, AssignmentPolicy};

use chrono::NaiveDate;

use crate::error::GenerateError;
use crate::models::{RecordId, ScheduleEntry};
use crate::store::RecordStore;

/// Generates duty schedules from a record store's roster and activities.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rotaplan::generator::ScheduleGenerator;
/// use rotaplan::models::{ActivityDraft, FrequencyUnit, MemberDraft};
/// use rotaplan::store::{MemoryStorage, RecordStore};
///
/// let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
/// store.add_member(MemberDraft::new("Ada")).unwrap();
/// store
///     .add_activity(ActivityDraft::new("standup", 1, FrequencyUnit::Days))
///     .unwrap();
///
/// let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
/// let entries = ScheduleGenerator::new()
///     .generate(&mut store, start, end)
///     .unwrap();
/// assert_eq!(entries.len(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    seed: Option<u64>,
}

impl ScheduleGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the random policy's seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates the schedule for `[start, end]` inclusive, replacing the
    /// previous batch.
    ///
    /// Fails without touching stored state when the range is inverted,
    /// the roster has no active members, or there are no activities.
    pub fn generate(
        &self,
        store: &mut RecordStore,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, GenerateError> {
        if start > end {
            return Err(GenerateError::InvalidDateRange { start, end });
        }
        let roster: Vec<(RecordId, String)> = store
            .active_members()
            .iter()
            .map(|m| (m.id, m.name.clone()))
            .collect();
        if roster.is_empty() {
            return Err(GenerateError::NoActiveMembers);
        }
        let activities = store.activities().to_vec();
        if activities.is_empty() {
            return Err(GenerateError::NoActivities);
        }

        // Previous batch goes away wholesale; there is no incremental append.
        store.replace_schedules(Vec::new())?;

        // Fairness counts start from zero each run.
        let mut counts = vec![0u32; roster.len()];
        let mut policy = policy_for(store.settings().algorithm, self.seed);

        let mut entries: Vec<ScheduleEntry> = Vec::new();
        for activity in &activities {
            let snapshot = count_sorted(&counts);
            policy.begin_activity(&snapshot);

            let mut current = start;
            while current <= end {
                let Some(slot) = policy.pick(&counts) else {
                    break;
                };
                let (member_id, member_name) = &roster[slot];
                entries.push(ScheduleEntry {
                    id: store.allocate_id(),
                    activity_id: activity.id,
                    activity_name: activity.name.clone(),
                    member_id: *member_id,
                    member_name: member_name.clone(),
                    date: current,
                    notified: false,
                });
                counts[slot] += 1;
                match activity.next_occurrence(current) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }

        store.replace_schedules(entries.clone())?;
        let final_counts: Vec<(RecordId, u32)> = roster
            .iter()
            .map(|(id, _)| *id)
            .zip(counts.iter().copied())
            .collect();
        store.set_participation_counts(&final_counts)?;

        tracing::info!(
            "generated {} entries for {} activities with {} policy",
            entries.len(),
            activities.len(),
            policy.name()
        );
        Ok(entries)
    }
}

/// Member slots sorted ascending by count; ties keep roster order.
fn count_sorted(counts: &[u32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by_key(|&slot| counts[slot]);
    order
}
