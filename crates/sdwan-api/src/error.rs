use thiserror::Error;

/// Top-level error type for the `sdwan-api` crate.
///
/// Covers the session handshake, transport, and response decoding.
/// `sdwan-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The controller answered the login form with its HTML login page,
    /// or did not hand out a session cookie.
    #[error("Authentication failed: invalid credentials")]
    InvalidCredentials,

    /// The XSRF token endpoint did not return a usable token.
    #[error("XSRF token unavailable (HTTP {status})")]
    TokenUnavailable { status: u16 },

    /// The controller served its login page instead of data.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// A session minted for one controller was presented to another.
    #[error("Session belongs to {session}, not {client}")]
    SessionMismatch { session: String, client: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration error (unreadable or invalid CA bundle).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The controller answered with something other than HTTP 200.
    #[error("Request failed (HTTP {status}): {body}")]
    RequestFailed { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::TokenUnavailable { .. } | Self::SessionExpired
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TokenUnavailable { status } | Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
