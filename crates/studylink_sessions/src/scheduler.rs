// --- File: crates/studylink_sessions/src/scheduler.rs ---
//! The session-reminder scheduler.
//!
//! Every `tick_secs` it scans for sessions starting within the next
//! `window_minutes` that have not been reminded yet, creates one
//! reminder notification per participant, then flips the session's
//! `reminder_sent` flag. At-least-once across crashes: the flag flips
//! only after every participant has a persisted notification, and the
//! per-(participant, session) dedup check absorbs any replay.

use chrono::{Duration, Utc};
use std::sync::Arc;
use studylink_config::ReminderConfig;
use studylink_db::models::{NotificationKind, StudySession};
use studylink_db::Store;
use studylink_notifications::logic::{
    create_reminder_notification, NewNotification, NotificationError,
};
use studylink_realtime::RealtimeGateway;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// What one scan pass did, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Sessions matched by the scan.
    pub due: usize,
    /// Sessions whose flag was flipped this pass.
    pub completed: usize,
    /// Reminder notifications created this pass.
    pub notifications: usize,
    /// Sessions left unflipped after a participant-level failure.
    pub failed: usize,
}

pub struct ReminderScheduler {
    store: Store,
    gateway: RealtimeGateway,
    config: ReminderConfig,
    // Overlap guard: a slow pass must not race a second one.
    running: Mutex<()>,
}

impl ReminderScheduler {
    pub fn new(store: Store, gateway: RealtimeGateway, config: ReminderConfig) -> Self {
        Self {
            store,
            gateway,
            config,
            running: Mutex::new(()),
        }
    }

    /// Run the scheduler until the process exits.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let tick_secs = self.config.tick_secs;
        tokio::spawn(async move {
            info!(
                "reminder scheduler started: tick every {}s, window {} minute(s)",
                tick_secs, self.config.window_minutes
            );
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(tick_secs.max(1)));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match self.tick().await {
                    Ok(report) if report.due > 0 => {
                        info!(
                            "reminder pass: {} due, {} completed, {} notification(s), {} failed",
                            report.due, report.completed, report.notifications, report.failed
                        );
                    }
                    Ok(_) => {}
                    Err(err) => error!("reminder scan failed: {}", err),
                }
            }
        })
    }

    /// Hold the pass guard the way an in-flight scan would.
    #[cfg(test)]
    pub(crate) async fn begin_pass(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.running.lock().await
    }

    /// One scan pass. A failure on one session is logged and skipped so
    /// the rest of the batch still goes out; the failed session stays
    /// unflipped and is retried next tick.
    pub async fn tick(&self) -> Result<TickReport, NotificationError> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("reminder pass still running, skipping tick");
            return Ok(TickReport::default());
        };

        let now = Utc::now();
        let window = Duration::minutes(self.config.window_minutes);
        let due = self
            .store
            .due_for_reminder(now, window)
            .await
            .map_err(NotificationError::from)?;

        let mut report = TickReport {
            due: due.len(),
            ..TickReport::default()
        };
        for session in &due {
            match self.remind_session(session).await {
                Ok(created) => {
                    report.completed += 1;
                    report.notifications += created;
                }
                Err(err) => {
                    report.failed += 1;
                    error!("reminder for session {} failed: {}", session.id, err);
                }
            }
        }
        Ok(report)
    }

    /// Notify every participant, then flip the flag. Returns how many
    /// notifications were created (dedup'd participants are skipped).
    async fn remind_session(&self, session: &StudySession) -> Result<usize, NotificationError> {
        let message = format!(
            "Reminder: Your study session \"{}\" starts in {} minutes!",
            session.title, self.config.window_minutes
        );
        let mut created = 0;
        for participant in &session.participants {
            if self.store.reminder_exists(participant, &session.id).await? {
                debug!(
                    "participant {} already reminded for session {}",
                    participant, session.id
                );
                continue;
            }
            create_reminder_notification(
                &self.store,
                &self.gateway,
                NewNotification {
                    user_id: participant.clone(),
                    kind: NotificationKind::Session,
                    message: message.clone(),
                    related_user_id: None,
                    session_id: Some(session.id.clone()),
                },
            )
            .await?;
            created += 1;
        }
        self.store.mark_reminder_sent(&session.id).await?;
        Ok(created)
    }
}
