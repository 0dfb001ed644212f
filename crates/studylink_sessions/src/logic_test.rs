#[cfg(test)]
mod tests {
    use crate::logic::{
        create_session_logic, delete_session_logic, list_sessions_logic, update_session_logic,
        SessionError,
    };
    use crate::models::{CreateSessionRequest, UpdateSessionRequest};
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use studylink_db::models::User;
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

    fn tomorrow_session(title: &str, participants: Vec<String>) -> CreateSessionRequest {
        let start = Utc::now() + Duration::hours(20);
        CreateSessionRequest {
            title: title.to_string(),
            description: None,
            start_time: start,
            end_time: start + Duration::hours(2),
            location: None,
            participants,
        }
    }

    #[tokio::test]
    async fn create_adds_creator_and_invites_participants() {
        let (store, gateway, u1, u2) = fixture().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway.registry().register(&u2.id, tx);

        let session = create_session_logic(
            &store,
            &gateway,
            &u1.id,
            tomorrow_session("Calculus review", vec![u2.id.clone()]),
        )
        .await
        .unwrap();

        assert!(session.participants.contains(&u1.id));
        assert!(session.participants.contains(&u2.id));
        assert!(!session.reminder_sent);

        // The invitee got a live invite and a durable notification.
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.event, "newNotification");
        assert_eq!(frame.data["type"], "session");
        assert_eq!(
            frame.data["message"],
            "You've been invited to a study session: \"Calculus review\""
        );
        let notifications = store.notifications_for(&u2.id).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].session_id.as_deref(), Some(session.id.as_str()));

        // The creator invites nobody, least of all themselves.
        assert!(store.notifications_for(&u1.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_bad_times_and_unknown_participants() {
        let (store, gateway, u1, u2) = fixture().await;

        let mut backwards = tomorrow_session("Backwards", vec![]);
        backwards.end_time = backwards.start_time - Duration::hours(1);
        assert!(matches!(
            create_session_logic(&store, &gateway, &u1.id, backwards).await,
            Err(SessionError::InvalidArgument(_))
        ));

        assert!(matches!(
            create_session_logic(
                &store,
                &gateway,
                &u1.id,
                tomorrow_session("  ", vec![u2.id.clone()]),
            )
            .await,
            Err(SessionError::InvalidArgument(_))
        ));

        assert!(matches!(
            create_session_logic(
                &store,
                &gateway,
                &u1.id,
                tomorrow_session("Ghost hunt", vec!["ghost".to_string()]),
            )
            .await,
            Err(SessionError::UserNotFound(_))
        ));
        // Nothing was persisted for the failed creates.
        assert!(list_sessions_logic(&store, &u1.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_is_creator_only_and_preserves_reminder_flag() {
        let (store, gateway, u1, u2) = fixture().await;
        let session = create_session_logic(
            &store,
            &gateway,
            &u1.id,
            tomorrow_session("Stats", vec![u2.id.clone()]),
        )
        .await
        .unwrap();
        store.mark_reminder_sent(&session.id).await.unwrap();

        assert!(matches!(
            update_session_logic(
                &store,
                &session.id,
                &u2.id,
                UpdateSessionRequest {
                    title: Some("Hijacked".to_string()),
                    ..UpdateSessionRequest::default()
                },
            )
            .await,
            Err(SessionError::Forbidden)
        ));

        let updated = update_session_logic(
            &store,
            &session.id,
            &u1.id,
            UpdateSessionRequest {
                title: Some("Stats II".to_string()),
                start_time: Some(session.start_time + Duration::hours(1)),
                end_time: Some(session.end_time + Duration::hours(1)),
                ..UpdateSessionRequest::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Stats II");
        // Moving the session does not re-arm the reminder.
        assert!(updated.reminder_sent);
    }

    #[tokio::test]
    async fn update_keeps_creator_in_participants() {
        let (store, gateway, u1, u2) = fixture().await;
        let session = create_session_logic(
            &store,
            &gateway,
            &u1.id,
            tomorrow_session("Linear algebra", vec![]),
        )
        .await
        .unwrap();

        let updated = update_session_logic(
            &store,
            &session.id,
            &u1.id,
            UpdateSessionRequest {
                participants: Some(vec![u2.id.clone()]),
                ..UpdateSessionRequest::default()
            },
        )
        .await
        .unwrap();
        assert!(updated.participants.contains(&u1.id));
        assert!(updated.participants.contains(&u2.id));
    }

    #[tokio::test]
    async fn delete_is_creator_only() {
        let (store, gateway, u1, u2) = fixture().await;
        let session = create_session_logic(
            &store,
            &gateway,
            &u1.id,
            tomorrow_session("Chemistry", vec![u2.id.clone()]),
        )
        .await
        .unwrap();

        assert!(matches!(
            delete_session_logic(&store, &session.id, &u2.id).await,
            Err(SessionError::Forbidden)
        ));
        delete_session_logic(&store, &session.id, &u1.id)
            .await
            .unwrap();
        assert!(store.find_session(&session.id).await.unwrap().is_none());
        assert!(matches!(
            delete_session_logic(&store, &session.id, &u1.id).await,
            Err(SessionError::SessionNotFound(_))
        ));
    }
}
