//! Reminder scanning.
//!
//! The notification scheduler periodically looks for schedule entries
//! whose date sits exactly `notification_days` ahead of today and pushes
//! each one through a [`NotifySink`] once, flagging it so later scans skip
//! it. Matching is by exact date equality: an entry whose day passes while
//! nothing is running is never retro-notified.
//!
//! # Lifecycle
//!
//! `start` performs an immediate scan and then repeats every 24 hours on a
//! spawned tokio task; `stop` cancels the task. Both are idempotent. Scans
//! serialize against all other store access through the shared mutex, so a
//! scan never observes a generation run in progress.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::models::{RecordId, ScheduleEntry};
use crate::store::RecordStore;

/// Receiver for fired reminders.
///
/// Delivery is fire-and-forget: the scanner flags an entry as notified
/// regardless of what the sink did with it, and failures are the sink's
/// own problem to log or swallow.
pub trait NotifySink: Send + Sync {
    /// Called once per entry crossing the lead-time threshold.
    fn notify(&self, entry: &ScheduleEntry);
}

/// Sink that logs each reminder through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotifySink for LogSink {
    fn notify(&self, entry: &ScheduleEntry) {
        tracing::info!(
            "reminder: {} covers {} on {}",
            entry.member_name,
            entry.activity_name,
            entry.date
        );
    }
}

/// Periodic reminder scanner with a start/stop lifecycle.
pub struct NotificationScheduler {
    store: Arc<Mutex<RecordStore>>,
    sink: Arc<dyn NotifySink>,
    scan_interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl NotificationScheduler {
    /// Creates a stopped scheduler over a shared store, logging reminders
    /// through [`LogSink`].
    pub fn new(store: Arc<Mutex<RecordStore>>) -> Self {
        Self {
            store,
            sink: Arc::new(LogSink),
            scan_interval: Duration::from_secs(24 * 60 * 60),
            handle: None,
        }
    }

    /// Replaces the delivery sink.
    pub fn with_sink(mut self, sink: Arc<dyn NotifySink>) -> Self {
        self.sink = sink;
        self
    }

    /// Overrides the scan period (the default is 24 hours).
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    /// Whether the periodic task is running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts the periodic task: one immediate scan, then one per period.
    /// No-op when already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        let period = self.scan_interval;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                // The first tick completes immediately.
                interval.tick().await;
                let today = Local::now().date_naive();
                match run_scan(&store, sink.as_ref(), today).await {
                    Ok(fired) if fired > 0 => {
                        tracing::info!("reminder scan fired {fired} notifications");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("reminder scan failed: {e}"),
                }
            }
        }));
        tracing::info!("notification scheduler started");
    }

    /// Cancels the periodic task. After this returns, no pending scan will
    /// run. No-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("notification scheduler stopped");
        }
    }

    /// Runs one scan using the local date. Returns how many reminders fired.
    pub async fn scan(&self) -> Result<usize, StoreError> {
        self.scan_on(Local::now().date_naive()).await
    }

    /// Runs one scan as if today were `today`.
    pub async fn scan_on(&self, today: NaiveDate) -> Result<usize, StoreError> {
        run_scan(&self.store, self.sink.as_ref(), today).await
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_scan(
    store: &Mutex<RecordStore>,
    sink: &dyn NotifySink,
    today: NaiveDate,
) -> Result<usize, StoreError> {
    let mut store = store.lock().await;
    if !store.settings().notification_enabled {
        return Ok(0);
    }
    let lead = u64::from(store.settings().notification_days);
    let Some(target) = today.checked_add_days(Days::new(lead)) else {
        return Ok(0);
    };

    let due: Vec<ScheduleEntry> = store
        .schedules()
        .iter()
        .filter(|e| e.date == target && !e.notified)
        .cloned()
        .collect();
    if due.is_empty() {
        return Ok(0);
    }

    for entry in &due {
        sink.notify(entry);
    }
    let ids: Vec<RecordId> = due.iter().map(|e| e.id).collect();
    store.mark_schedules_notified(&ids)?;
    Ok(due.len())
}
