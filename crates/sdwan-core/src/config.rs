// ── Runtime connection configuration ──
//
// These types describe *how* to reach a controller. They carry credential
// data and connection tuning, but never touch disk. The CLI constructs a
// `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use sdwan_api::{Credentials, Endpoint};

use crate::error::CoreError;

/// TLS verification strategy.
///
/// Verification is on unless the operator explicitly opts out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab controllers).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single controller.
///
/// Consumed by [`Controller::connect`](crate::Controller::connect); the
/// credentials are dropped once the session is established.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller address (host, port, base path).
    pub endpoint: Endpoint,
    /// Login credentials.
    pub credentials: Credentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Bounds for waiting on an asynchronous action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between two status requests.
    pub interval: Duration,
    /// Give up (with `Outcome::TimedOut`) after this long.
    pub timeout: Duration,
}

impl PollOptions {
    /// Shortest delay allowed between two status requests.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

    /// Reject intervals that would poll the controller back to back.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval < Self::MIN_INTERVAL {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "poll interval must be at least {}ms, got {}ms",
                    Self::MIN_INTERVAL.as_millis(),
                    self.interval.as_millis()
                ),
            });
        }
        Ok(())
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
        }
    }
}
