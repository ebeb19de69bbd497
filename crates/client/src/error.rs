use tokio_tungstenite::tungstenite;

/// Errors surfaced directly from [`crate::ChatSession`] calls.
///
/// Transport failures and malformed payloads are deliberately not here: they
/// arrive as [`crate::SessionEvent`]s and never abort the session's owner.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required identity field was empty after trimming.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The configured base URL could not be turned into a WebSocket request.
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] tungstenite::Error),
}
