//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use sdwan_config::ConfigError;
use sdwan_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const ACTION_FAILED: i32 = 9;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(sdwan::connection_failed),
        help(
            "Check that the controller is reachable on the configured host and port.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(sdwan::tls_error),
        help(
            "Point --ca-cert at the controller's CA bundle, or use --insecure (-k)\n\
             for a lab controller with a self-signed certificate."
        )
    )]
    TlsError { message: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(sdwan::timeout),
        help("Increase the per-request timeout with --timeout or check controller load.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for profile '{profile}'")]
    #[diagnostic(
        code(sdwan::auth_failed),
        help(
            "The controller rejected the username or password.\n\
             Run: sdwan config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("Controller did not issue an XSRF token (HTTP {status})")]
    #[diagnostic(
        code(sdwan::token_unavailable),
        help("The login succeeded but the token endpoint refused the session.")
    )]
    TokenUnavailable { status: u16 },

    #[error("Session expired")]
    #[diagnostic(
        code(sdwan::session_expired),
        help("The controller answered with its login page. Re-run the command to log in again.")
    )]
    SessionExpired,

    // ── Configuration ────────────────────────────────────────────────
    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(sdwan::missing_setting),
        help(
            "Pass --host and --port (or --url), --username and --password,\n\
             set SDWAN_IP / SDWAN_PORT / SDWAN_USERNAME / SDWAN_PASSWORD,\n\
             or create a profile with: sdwan config init\n\
             Config file: {path}"
        )
    )]
    MissingSetting {
        what: String,
        profile: String,
        path: String,
    },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sdwan::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sdwan config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(sdwan::config))]
    Config { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller request failed (HTTP {status}): {message}")]
    #[diagnostic(code(sdwan::request_failed))]
    RequestFailed { status: u16, message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(sdwan::api_error))]
    ApiError { message: String },

    // ── Actions ──────────────────────────────────────────────────────
    #[error("Action {action_id} failed on {failed} device(s)")]
    #[diagnostic(
        code(sdwan::action_failed),
        help("Inspect per-device activity with: sdwan action status {action_id}")
    )]
    ActionFailed { action_id: String, failed: u64 },

    #[error("Action {action_id} did not finish within {waited_secs}s")]
    #[diagnostic(
        code(sdwan::action_timeout),
        help(
            "The action may still complete on the controller.\n\
             Keep following it with: sdwan action wait {action_id} --wait-timeout 30m"
        )
    )]
    ActionTimedOut { action_id: String, waited_secs: u64 },

    #[error("Interrupted while waiting for action {action_id}")]
    #[diagnostic(
        code(sdwan::interrupted),
        help("The action keeps running on the controller: sdwan action wait {action_id}")
    )]
    Interrupted { action_id: String },

    #[error("Interrupted")]
    #[diagnostic(
        code(sdwan::interrupted),
        help("An action already submitted keeps running on the controller.")
    )]
    Aborted,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sdwan::validation))]
    Validation { field: String, reason: String },

    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(sdwan::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::TokenUnavailable { .. } | Self::SessionExpired => {
                exit_code::AUTH
            }
            Self::Timeout { .. } | Self::ActionTimedOut { .. } => exit_code::TIMEOUT,
            Self::ActionFailed { .. } => exit_code::ACTION_FAILED,
            Self::Interrupted { .. } | Self::Aborted => exit_code::INTERRUPTED,
            Self::MissingSetting { .. }
            | Self::ProfileNotFound { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Tls { message } => CliError::TlsError { message },
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::InvalidCredentials => CliError::AuthFailed {
                profile: "default".into(),
            },
            CoreError::TokenUnavailable { status } => CliError::TokenUnavailable { status },
            CoreError::SessionExpired => CliError::SessionExpired,
            CoreError::RequestFailed { status, message } => {
                CliError::RequestFailed { status, message }
            }
            CoreError::MalformedResponse { message } | CoreError::Api { message } => {
                CliError::ApiError { message }
            }
            CoreError::ActionFailed { action_id, failed } => {
                CliError::ActionFailed { action_id, failed }
            }
            CoreError::ActionTimedOut {
                action_id,
                waited_secs,
            } => CliError::ActionTimedOut {
                action_id,
                waited_secs,
            },
            CoreError::Cancelled { action_id } => CliError::Interrupted { action_id },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Missing { what, profile } => CliError::MissingSetting {
                what,
                profile,
                path: sdwan_config::config_path().display().to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_outcomes_have_distinct_exit_codes() {
        let failed = CliError::from(CoreError::ActionFailed {
            action_id: "push-1".into(),
            failed: 1,
        });
        let timed_out = CliError::from(CoreError::ActionTimedOut {
            action_id: "push-1".into(),
            waited_secs: 600,
        });
        let cancelled = CliError::from(CoreError::Cancelled {
            action_id: "push-1".into(),
        });

        assert_eq!(failed.exit_code(), exit_code::ACTION_FAILED);
        assert_eq!(timed_out.exit_code(), exit_code::TIMEOUT);
        assert_eq!(cancelled.exit_code(), exit_code::INTERRUPTED);
        assert_eq!(CliError::Aborted.exit_code(), exit_code::INTERRUPTED);
    }

    #[test]
    fn auth_and_config_errors_map_to_their_codes() {
        assert_eq!(
            CliError::from(CoreError::InvalidCredentials).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(CoreError::SessionExpired).exit_code(),
            exit_code::AUTH
        );
        let missing = CliError::from(ConfigError::Missing {
            what: "controller host".into(),
            profile: "default".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::USAGE);
        assert_ne!(exit_code::SUCCESS, missing.exit_code());
    }
}
