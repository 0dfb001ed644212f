#[cfg(test)]
mod tests {
    use crate::logic::{
        delete_message_logic, edit_message_logic, mark_thread_read_logic, send_message_logic,
        unread_counts_logic, MessagingError,
    };
    use crate::models::SendMessageRequest;
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

    fn text_message(recipient: &User, body: &str) -> SendMessageRequest {
        SendMessageRequest {
            recipient_id: recipient.id.clone(),
            body: Some(body.to_string()),
            file: None,
        }
    }

    // Send with one live recipient channel.
    #[tokio::test]
    async fn send_persists_notifies_and_pushes() {
        let (store, gateway, u1, u2) = fixture().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway.registry().register(&u2.id, tx);

        let message = send_message_logic(&store, &gateway, &u1.id, text_message(&u2, "hello"))
            .await
            .unwrap();
        assert_eq!(message.body.as_deref(), Some("hello"));
        assert!(!message.read);

        // The live channel got the notification event.
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.event, "newNotification");
        assert_eq!(frame.data["type"], "message");
        assert_eq!(frame.data["relatedUserId"], u1.id.as_str());

        // Durable state: one thread message, one notification.
        let thread = store.thread_between(&u1.id, &u2.id).await.unwrap();
        assert_eq!(thread.len(), 1);
        let notifications = store.notifications_for(&u2.id).await.unwrap();
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn send_increments_unread_even_with_zero_channels() {
        let (store, gateway, u1, u2) = fixture().await;
        send_message_logic(&store, &gateway, &u1.id, text_message(&u2, "hi"))
            .await
            .unwrap();
        let counts = unread_counts_logic(&store, &u2.id).await.unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].sender_id, u1.id);
        assert_eq!(counts[0].count, 1);
    }

    #[tokio::test]
    async fn send_requires_body_or_file_and_known_users() {
        let (store, gateway, u1, u2) = fixture().await;

        let empty = SendMessageRequest {
            recipient_id: u2.id.clone(),
            body: Some("   ".to_string()),
            file: None,
        };
        assert!(matches!(
            send_message_logic(&store, &gateway, &u1.id, empty).await,
            Err(MessagingError::InvalidArgument(_))
        ));

        let to_ghost = SendMessageRequest {
            recipient_id: "ghost".to_string(),
            body: Some("hello".to_string()),
            file: None,
        };
        assert!(matches!(
            send_message_logic(&store, &gateway, &u1.id, to_ghost).await,
            Err(MessagingError::UserNotFound(_))
        ));

        assert!(matches!(
            send_message_logic(&store, &gateway, "ghost", text_message(&u2, "hi")).await,
            Err(MessagingError::UserNotFound(_))
        ));
    }

    // After mark-read the sender drops out of the counts.
    #[tokio::test]
    async fn mark_thread_read_clears_counts_and_is_idempotent() {
        let (store, gateway, u1, u2) = fixture().await;
        send_message_logic(&store, &gateway, &u1.id, text_message(&u2, "one"))
            .await
            .unwrap();
        send_message_logic(&store, &gateway, &u1.id, text_message(&u2, "two"))
            .await
            .unwrap();

        assert_eq!(mark_thread_read_logic(&store, &u2.id, &u1.id).await.unwrap(), 2);
        assert_eq!(mark_thread_read_logic(&store, &u2.id, &u1.id).await.unwrap(), 0);
        assert!(unread_counts_logic(&store, &u2.id).await.unwrap().is_empty());
    }

    // A non-sender cannot edit or delete.
    #[tokio::test]
    async fn edit_and_delete_are_sender_only() {
        let (store, gateway, u1, u2) = fixture().await;
        let message = send_message_logic(&store, &gateway, &u1.id, text_message(&u2, "original"))
            .await
            .unwrap();

        assert!(matches!(
            edit_message_logic(&store, &message.id, &u2.id, "hijacked").await,
            Err(MessagingError::Forbidden)
        ));
        assert!(matches!(
            delete_message_logic(&store, &message.id, &u2.id).await,
            Err(MessagingError::Forbidden)
        ));

        // Message is unchanged and still retrievable.
        let stored = store.find_message(&message.id).await.unwrap().unwrap();
        assert_eq!(stored.body.as_deref(), Some("original"));
        assert!(!stored.edited);

        let edited = edit_message_logic(&store, &message.id, &u1.id, "fixed")
            .await
            .unwrap();
        assert_eq!(edited.body.as_deref(), Some("fixed"));
        assert!(edited.edited);

        delete_message_logic(&store, &message.id, &u1.id)
            .await
            .unwrap();
        assert!(store.find_message(&message.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn editing_missing_message_is_not_found() {
        let (store, _gateway, u1, _u2) = fixture().await;
        assert!(matches!(
            edit_message_logic(&store, "missing", &u1.id, "body").await,
            Err(MessagingError::MessageNotFound(_))
        ));
    }
}
