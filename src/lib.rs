//! Duty roster planning for recurring team activities.
//!
//! Tracks a roster of members and a set of recurring activities, generates
//! a duty schedule assigning members to activity occurrences over a date
//! range, and fires reminders as occurrences approach.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Member`, `Activity`, `ScheduleEntry`,
//!   `Settings`, plus typed drafts and patches
//! - **`store`**: Persistent record store with write-through JSON documents
//! - **`generator`**: Schedule generation and the assignment policies
//!   (rotation, random, balanced)
//! - **`notifier`**: Periodic reminder scanning behind a `NotifySink` seam
//! - **`error`**: Failure taxonomy
//!
//! # Architecture
//!
//! There are no ambient singletons: construct one [`store::RecordStore`]
//! over a storage backend and hand it to whatever needs it. The generator
//! borrows the store mutably for the duration of a run; the notifier
//! shares it behind `Arc<tokio::sync::Mutex<_>>` so scans serialize
//! against manual operations.

pub mod error;
pub mod generator;
pub mod models;
pub mod notifier;
pub mod store;
