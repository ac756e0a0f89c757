// ── Core error types ──
//
// User-facing errors from sdwan-core. Consumers never see reqwest errors
// or raw JSON failures directly; the `From<sdwan_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("TLS setup failed: {message}")]
    Tls { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Authentication failed: invalid username or password")]
    InvalidCredentials,

    #[error("Controller did not issue an XSRF token (HTTP {status})")]
    TokenUnavailable { status: u16 },

    #[error("Session expired -- the controller served its login page")]
    SessionExpired,

    // ── API errors ───────────────────────────────────────────────────
    #[error("Request failed (HTTP {status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Malformed controller response: {message}")]
    MalformedResponse { message: String },

    #[error("API error: {message}")]
    Api { message: String },

    // ── Action errors ────────────────────────────────────────────────
    #[error("Action {action_id} finished with {failed} failure(s)")]
    ActionFailed { action_id: String, failed: u64 },

    #[error("Action {action_id} still pending after {waited_secs}s")]
    ActionTimedOut { action_id: String, waited_secs: u64 },

    #[error("Waiting for action {action_id} was cancelled")]
    Cancelled { action_id: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures of the login handshake or session.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::TokenUnavailable { .. } | Self::SessionExpired
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sdwan_api::Error> for CoreError {
    fn from(err: sdwan_api::Error) -> Self {
        match err {
            sdwan_api::Error::InvalidCredentials => CoreError::InvalidCredentials,
            sdwan_api::Error::TokenUnavailable { status } => CoreError::TokenUnavailable { status },
            sdwan_api::Error::SessionExpired => CoreError::SessionExpired,
            sdwan_api::Error::SessionMismatch { session, client } => CoreError::Config {
                message: format!("session for {session} used against {client}"),
            },
            sdwan_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            sdwan_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sdwan_api::Error::Tls(message) => CoreError::Tls { message },
            sdwan_api::Error::RequestFailed { status, body } => CoreError::RequestFailed {
                status,
                message: body,
            },
            sdwan_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}
