//! Scheduler engine: one tick = snapshot, match, draw, dispatch.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use versecast_core::config::NotificationConfig;
use versecast_core::error::Result;
use versecast_core::traits::Notifier;
use versecast_core::types::{Notification, Preference, TimeOfDay};
use versecast_corpus::CorpusLibrary;

use crate::schedule::{ScheduleMode, due_preferences};
use crate::store::PreferenceStore;

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub struct SchedulerEngine {
    store: PreferenceStore,
    library: Arc<CorpusLibrary>,
    notifier: Arc<dyn Notifier>,
    mode: ScheduleMode,
    notification: NotificationConfig,
}

impl SchedulerEngine {
    pub fn new(
        store: PreferenceStore,
        library: Arc<CorpusLibrary>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            library,
            notifier,
            mode: ScheduleMode::default(),
            notification: NotificationConfig::default(),
        }
    }

    pub fn with_mode(mut self, mode: ScheduleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = notification;
        self
    }

    /// Run one matching cycle against the clock value `now`.
    ///
    /// Deliveries of the same tick run concurrently. A failure is logged and
    /// counted for that recipient only. Whether a tick should happen at all
    /// (the daily variant) is decided by [`ScheduleMode::should_fire`] in the
    /// runner, not here.
    pub async fn tick(&self, now: NaiveDateTime) -> TickReport {
        let snapshot = self.store.snapshot();
        let due = due_preferences(self.mode, &now, &snapshot);

        let mut report = TickReport {
            matched: due.len(),
            ..TickReport::default()
        };
        if due.is_empty() {
            tracing::debug!("Tick {}: nothing due", now.format("%H:%M"));
            return report;
        }

        let pending: Vec<_> = due.iter().map(|p| self.dispatch(p)).collect();
        let results = futures::future::join_all(pending).await;

        for (preference, result) in due.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Delivery to {} (preference {}) failed: {e}",
                        preference.destination,
                        preference.id
                    );
                }
            }
        }

        tracing::info!(
            "Tick {}: {} due, {} delivered, {} failed",
            now.format("%H:%M"),
            report.matched,
            report.delivered,
            report.failed
        );
        report
    }

    async fn dispatch(&self, preference: &Preference) -> Result<()> {
        let passage = self.library.select_random(&preference.translation)?;
        let notification = Notification::for_passage(
            &passage,
            self.notification.title.clone(),
            self.notification.icon.clone(),
            self.notification.badge.clone(),
        );
        self.notifier.deliver(&preference.destination, &notification).await
    }

    /// Tick on every wall-clock minute boundary until `shutdown` resolves.
    ///
    /// Each tick is awaited before the next sleep, so cycles never overlap.
    /// A tick runs in its own task; a panic inside one is logged and the loop
    /// keeps going. A minute that was already served is skipped, which covers
    /// the wall clock being stepped back after a tick.
    pub async fn run(self: Arc<Self>, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        tracing::info!(
            "⏰ Scheduler started ({:?}, notifier: {})",
            self.mode,
            self.notifier.name()
        );

        let mut guard = MinuteGuard::default();
        loop {
            let wait = until_next_minute(&Local::now());
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = &mut shutdown => break,
            }

            let now = Local::now().naive_local();
            if !self.mode.should_fire(&now) || !guard.claim(&now) {
                continue;
            }

            let engine = Arc::clone(&self);
            if let Err(e) = tokio::spawn(async move { engine.tick(now).await }).await {
                tracing::error!("Tick {} aborted: {e}", now.format("%H:%M"));
            }
        }
        tracing::info!("Scheduler stopped");
    }
}

/// Remembers the last calendar minute a tick was started for.
#[derive(Debug, Default)]
struct MinuteGuard {
    last: Option<(NaiveDate, TimeOfDay)>,
}

impl MinuteGuard {
    /// `true` the first time a given minute is seen in a row, `false` on a repeat.
    fn claim(&mut self, now: &NaiveDateTime) -> bool {
        let minute = (now.date(), TimeOfDay::of(now));
        if self.last == Some(minute) {
            tracing::debug!("Minute {} already served, skipping", now.format("%Y-%m-%d %H:%M"));
            return false;
        }
        self.last = Some(minute);
        true
    }
}

/// Time left until the next `:00` second. Always at least a few milliseconds
/// so a tick landing exactly on the boundary does not fire twice.
pub fn until_next_minute(now: &impl Timelike) -> Duration {
    let elapsed = Duration::from_secs(u64::from(now.second().min(59)))
        + Duration::from_nanos(u64::from(now.nanosecond().min(999_999_999)));
    Duration::from_secs(60)
        .saturating_sub(elapsed)
        .max(Duration::from_millis(5))
}
