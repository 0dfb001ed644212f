#[cfg(test)]
mod tests {
    use crate::scheduler::{ReminderScheduler, TickReport};
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use studylink_config::ReminderConfig;
    use studylink_db::models::{StudySession, User};
    use studylink_db::Store;
    use studylink_realtime::{ConnectionRegistry, RealtimeGateway};
    use tokio::sync::mpsc;

    async fn fixture() -> (Store, RealtimeGateway, User, User) {
        let store = Store::from_url("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        let u1 = User::new("Uma", "uma@example.edu", "hash", "Example U");
        let u2 = User::new("Vik", "vik@example.edu", "hash", "Example U");
        store.insert_user(&u1).await.unwrap();
        store.insert_user(&u2).await.unwrap();
        let gateway = RealtimeGateway::new(Arc::new(ConnectionRegistry::new()));
        (store, gateway, u1, u2)
    }

    fn scheduler(store: &Store, gateway: &RealtimeGateway) -> ReminderScheduler {
        ReminderScheduler::new(
            store.clone(),
            gateway.clone(),
            ReminderConfig {
                tick_secs: 60,
                window_minutes: 10,
            },
        )
    }

    async fn starting_soon(store: &Store, u1: &User, u2: &User, minutes: i64) -> StudySession {
        let start = Utc::now() + Duration::minutes(minutes);
        let session = StudySession::new(
            "Exam prep",
            &u1.id,
            vec![u1.id.clone(), u2.id.clone()],
            start,
            start + Duration::hours(1),
        );
        store.insert_session(&session).await.unwrap();
        session
    }

    #[tokio::test]
    async fn tick_reminds_every_participant_exactly_once() {
        let (store, gateway, u1, u2) = fixture().await;
        let session = starting_soon(&store, &u1, &u2, 5).await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway.registry().register(&u2.id, tx);

        let scheduler = scheduler(&store, &gateway);
        let report = scheduler.tick().await.unwrap();
        assert_eq!(report.due, 1);
        assert_eq!(report.completed, 1);
        assert_eq!(report.notifications, 2);
        assert_eq!(report.failed, 0);

        // The live participant got the dedicated reminder event.
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.event, "session_reminder");
        assert_eq!(
            frame.data["message"],
            "Reminder: Your study session \"Exam prep\" starts in 10 minutes!"
        );
        assert_eq!(frame.data["sessionId"], session.id.as_str());

        // Both participants hold a durable reminder; the flag flipped.
        assert_eq!(store.notifications_for(&u1.id).await.unwrap().len(), 1);
        assert_eq!(store.notifications_for(&u2.id).await.unwrap().len(), 1);
        let stored = store.find_session(&session.id).await.unwrap().unwrap();
        assert!(stored.reminder_sent);

        // A second pass finds nothing due.
        let second = scheduler.tick().await.unwrap();
        assert_eq!(second.due, 0);
        assert_eq!(second.notifications, 0);
        assert_eq!(store.notifications_for(&u2.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tick_is_skipped_while_a_pass_is_in_flight() {
        let (store, gateway, u1, u2) = fixture().await;
        starting_soon(&store, &u1, &u2, 5).await;
        let scheduler = scheduler(&store, &gateway);

        // While a pass holds the guard, a concurrent tick does nothing.
        let in_flight = scheduler.begin_pass().await;
        let skipped = scheduler.tick().await.unwrap();
        assert_eq!(skipped, TickReport::default());
        assert!(store.notifications_for(&u2.id).await.unwrap().is_empty());
        drop(in_flight);

        // Once released, the next tick processes the due session.
        let report = scheduler.tick().await.unwrap();
        assert_eq!(report.due, 1);
        assert_eq!(report.notifications, 2);
    }

    #[tokio::test]
    async fn sessions_outside_the_window_wait() {
        let (store, gateway, u1, u2) = fixture().await;
        starting_soon(&store, &u1, &u2, 45).await;

        let report = scheduler(&store, &gateway).tick().await.unwrap();
        assert_eq!(report.due, 0);
        assert!(store.notifications_for(&u2.id).await.unwrap().is_empty());
    }

    // Crash-recovery replay: a participant already holding a reminder
    // is skipped, the rest still get theirs.
    #[tokio::test]
    async fn replay_skips_already_reminded_participants() {
        let (store, gateway, u1, u2) = fixture().await;
        let session = starting_soon(&store, &u1, &u2, 5).await;

        let scheduler = scheduler(&store, &gateway);
        // Simulate a crash between notifying u1 and flipping the flag.
        let partial = studylink_db::models::Notification::new(
            &u1.id,
            studylink_db::models::NotificationKind::Session,
            "Reminder: Your study session \"Exam prep\" starts in 10 minutes!",
            None,
            Some(session.id.clone()),
        );
        store.insert_notification(&partial).await.unwrap();

        let report = scheduler.tick().await.unwrap();
        assert_eq!(report.due, 1);
        assert_eq!(report.completed, 1);
        assert_eq!(report.notifications, 1);

        // No duplicate for u1, exactly one for u2.
        assert_eq!(store.notifications_for(&u1.id).await.unwrap().len(), 1);
        assert_eq!(store.notifications_for(&u2.id).await.unwrap().len(), 1);
    }
}
