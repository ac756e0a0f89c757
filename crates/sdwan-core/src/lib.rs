//! Domain layer between `sdwan-api` and the `sdwan` CLI.
//!
//! - **[`Controller`]**: authenticates once via
//!   [`connect()`](Controller::connect) and owns the resulting session; every
//!   read and mutation goes through it, so one controller endpoint always
//!   reuses one session.
//!
//! - **[`poller`]**: [`await_completion`](poller::await_completion) drives
//!   the asynchronous action protocol: poll the status endpoint until it
//!   reports `done`, bounded by a timeout and a cancellation token.
//!
//! - **Domain model** ([`model`]): `Device`, `Template`, `AttachedDevice`,
//!   `ActionStatus`, and the terminal [`Outcome`] of an action.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod poller;
pub mod requests;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, PollOptions, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use poller::{ActionStatusSource, await_completion};
pub use requests::{AttachTemplate, DetachDevice};

pub use model::{
    ActionDeviceStatus, ActionId, ActionState, ActionStatus, AttachedDevice, Device, Outcome,
    Template,
};

// Session plumbing is defined by the API crate; re-exported so consumers
// only depend on core.
pub use sdwan_api::{Credentials, Endpoint, Session};
pub use tokio_util::sync::CancellationToken;
