//! Error taxonomy.
//!
//! Two public error enums cover the crate: [`StoreError`] for persistence
//! and import failures, [`GenerateError`] for generation preconditions.
//! A missing record on update or delete is not an error anywhere; those
//! operations report it as `Ok(None)` / `Ok(false)`.

use chrono::NaiveDate;
use thiserror::Error;

/// Persistence and import failures.
///
/// Any variant is fatal to the attempted operation. A single collection
/// write is atomic; a failure never leaves one collection half-written.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage I/O failed.
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A collection document could not be serialized or parsed.
    #[error("collection document error: {0}")]
    Document(#[from] serde_json::Error),

    /// An import payload was not valid JSON; the store is unmodified.
    #[error("import payload is not valid JSON: {0}")]
    ImportParse(serde_json::Error),
}

/// Schedule generation failures.
///
/// All variants are checked before any write, so a failed run leaves the
/// previous schedule batch untouched.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The roster has no active members to assign.
    #[error("no active members to assign")]
    NoActiveMembers,

    /// There are no activities to schedule.
    #[error("no activities to schedule")]
    NoActivities,

    /// The window start falls after its end.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Persisting the generated batch or updated counts failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
