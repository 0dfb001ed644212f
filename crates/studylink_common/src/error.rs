// --- File: crates/studylink_common/src/error.rs ---
use axum::http::StatusCode;
use thiserror::Error;

/// The base error taxonomy shared across StudyLink crates.
///
/// Domain crates define their own thiserror enums; the variants here
/// name the failure classes the HTTP boundary must distinguish, and
/// [`HttpStatusCode`] is the seam every handler maps through.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed input: empty message body with no attachment, bad id,
    /// inverted session time range, and similar. Never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced user/message/session/notification does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The authenticated caller is not the owner/authorized actor.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing, malformed or expired credential.
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    /// Persistence store timeout or connection error. Retryable with
    /// backoff at the calling layer, surfaced as 5xx to clients.
    #[error("Store temporarily unavailable: {0}")]
    TransientStoreFailure(String),

    /// Error occurred during a store query itself (not transient).
    #[error("Store error: {0}")]
    StoreError(String),

    /// Error that doesn't fit into any other category.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> StatusCode;
}

impl HttpStatusCode for CoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            CoreError::AuthenticationFailure(_) => StatusCode::UNAUTHORIZED,
            CoreError::TransientStoreFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoreError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
