#[cfg(test)]
mod tests {
    use crate::events::PushFrame;
    use crate::gateway::RealtimeGateway;
    use crate::registry::ConnectionRegistry;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn gateway() -> RealtimeGateway {
        RealtimeGateway::new(Arc::new(ConnectionRegistry::new()))
    }

    #[tokio::test]
    async fn publish_with_zero_channels_is_a_noop() {
        let gateway = gateway();
        // Must not panic, must not block, must deliver nowhere.
        let delivered = gateway.publish("offline-user", PushFrame::typing("someone"));
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn publish_fans_out_to_all_channels_of_the_user() {
        let gateway = gateway();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        gateway.registry().register("user-1", tx1);
        gateway.registry().register("user-1", tx2);

        let delivered = gateway.publish("user-1", PushFrame::receive_message("user-2", "hi"));
        assert_eq!(delivered, 2);

        for rx in [&mut rx1, &mut rx2] {
            let frame = rx.recv().await.expect("frame delivered");
            assert_eq!(frame.event, "receiveMessage");
            assert_eq!(frame.data["senderId"], "user-2");
        }
    }

    #[tokio::test]
    async fn frames_arrive_in_publish_order() {
        let gateway = gateway();
        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway.registry().register("user-1", tx);

        gateway.publish("user-1", PushFrame::receive_message("user-2", "first"));
        gateway.publish("user-1", PushFrame::receive_message("user-2", "second"));
        gateway.publish("user-1", PushFrame::stop_typing("user-2"));

        assert_eq!(rx.recv().await.unwrap().data["message"], "first");
        assert_eq!(rx.recv().await.unwrap().data["message"], "second");
        assert_eq!(rx.recv().await.unwrap().event, "stopTyping");
    }

    #[tokio::test]
    async fn one_dead_channel_does_not_block_the_others() {
        let gateway = gateway();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        gateway.registry().register("user-1", tx_dead);
        gateway.registry().register("user-1", tx_live);
        drop(rx_dead);

        let delivered = gateway.publish("user-1", PushFrame::stop_typing("user-2"));
        assert_eq!(delivered, 1);
        assert_eq!(rx_live.recv().await.unwrap().event, "stopTyping");
    }

    #[tokio::test]
    async fn publish_does_not_reach_other_users() {
        let gateway = gateway();
        let (tx, mut rx) = mpsc::unbounded_channel();
        gateway.registry().register("user-2", tx);

        gateway.publish("user-1", PushFrame::typing("user-3"));
        assert!(rx.try_recv().is_err());
    }
}
