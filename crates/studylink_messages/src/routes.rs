// --- File: crates/studylink_messages/src/routes.rs ---
use crate::handlers::{
    delete_message_handler, edit_message_handler, mark_thread_read_handler,
    recent_conversations_handler, send_message_handler, thread_handler, unread_counts_handler,
    MessagingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(state: Arc<MessagingState>) -> Router {
    // GET {id} reads the thread with that user; PUT/DELETE {id} address
    // a message id. Static segments ("recent", "unread") win over the
    // capture, so declaration order does not matter.
    Router::new()
        .route("/messages", post(send_message_handler))
        .route("/messages/recent", get(recent_conversations_handler))
        .route("/messages/unread/counts", get(unread_counts_handler))
        .route(
            "/messages/{id}",
            get(thread_handler)
                .put(edit_message_handler)
                .delete(delete_message_handler),
        )
        .route("/messages/{id}/read", post(mark_thread_read_handler))
        .with_state(state)
}
