//! Roster domain models.
//!
//! Provides the core data types for duty-roster planning: who can be
//! assigned ([`Member`]), what recurs ([`Activity`]), what was planned
//! ([`ScheduleEntry`]), and how planning behaves ([`Settings`]).
//!
//! # Record Identity
//!
//! Every persisted record carries a [`RecordId`] allocated by the store.
//! Ids are immutable after creation and monotonic within a store instance.
//!
//! # Serialized Form
//!
//! All models serialize to camelCase JSON; the persisted documents and the
//! export snapshot share the same field names.

mod activity;
mod member;
mod schedule;
mod settings;

pub use activity::{Activity, ActivityDraft, ActivityPatch, FrequencyUnit};
pub use member::{Member, MemberDraft, MemberPatch, MemberStatus};
pub use schedule::{ScheduleDraft, ScheduleEntry, SchedulePatch};
pub use settings::{Algorithm, Settings};

/// Opaque record identifier, unique within a store.
pub type RecordId = u64;
