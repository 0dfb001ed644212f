#[cfg(test)]
mod tests {
    use crate::logic::{
        create_notification, list_notifications, mark_notification_read, NewNotification,
        NotificationError,
    };
    use std::sync::Arc;
    use studylink_db::models::{NotificationKind, User};
    use studylink_db::Store;
    use studylink_realtime::{ConnectionRegistry, RealtimeGateway};
    use tokio::sync::mpsc;

    async fn fixture() -> (Store, RealtimeGateway, User, User) {
        let store = Store::from_url("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        let alice = User::new("Alice", "alice@example.edu", "hash", "Example U");
        let bob = User::new("Bob", "bob@example.edu", "hash", "Example U");
        store.insert_user(&alice).await.unwrap();
        store.insert_user(&bob).await.unwrap();
        let gateway = RealtimeGateway::new(Arc::new(ConnectionRegistry::new()));
        (store, gateway, alice, bob)
    }

    fn message_notification(target: &User, actor: &User) -> NewNotification {
        NewNotification {
            user_id: target.id.clone(),
            kind: NotificationKind::Message,
            message: format!("You have a new message from {}", actor.name),
            related_user_id: Some(actor.id.clone()),
            session_id: None,
        }
    }

    #[tokio::test]
    async fn create_persists_then_pushes_with_actor_name() {
        let (store, gateway, alice, bob) = fixture().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway.registry().register(&bob.id, tx);

        let created = create_notification(&store, &gateway, message_notification(&bob, &alice))
            .await
            .unwrap();

        // Durable record exists regardless of the push.
        let stored = store.find_notification(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.kind, NotificationKind::Message);
        assert!(!stored.read);

        let frame = rx.recv().await.expect("live push delivered");
        assert_eq!(frame.event, "newNotification");
        assert_eq!(frame.data["id"], created.id.as_str());
        assert_eq!(frame.data["type"], "message");
        assert_eq!(frame.data["relatedUserName"], "Alice");
    }

    #[tokio::test]
    async fn create_succeeds_with_zero_live_channels() {
        let (store, gateway, alice, bob) = fixture().await;
        let created = create_notification(&store, &gateway, message_notification(&bob, &alice))
            .await
            .unwrap();
        let listed = list_notifications(&store, &bob.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn mark_read_is_owner_only_and_idempotent() {
        let (store, gateway, alice, bob) = fixture().await;
        let created = create_notification(&store, &gateway, message_notification(&bob, &alice))
            .await
            .unwrap();

        // Alice is not the owner.
        assert!(matches!(
            mark_notification_read(&store, &created.id, &alice.id).await,
            Err(NotificationError::Forbidden)
        ));

        mark_notification_read(&store, &created.id, &bob.id)
            .await
            .unwrap();
        mark_notification_read(&store, &created.id, &bob.id)
            .await
            .unwrap();
        let stored = store.find_notification(&created.id).await.unwrap().unwrap();
        assert!(stored.read);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_is_not_found() {
        let (store, _gateway, alice, _bob) = fixture().await;
        assert!(matches!(
            mark_notification_read(&store, "missing", &alice.id).await,
            Err(NotificationError::NotFound(_))
        ));
    }
}
