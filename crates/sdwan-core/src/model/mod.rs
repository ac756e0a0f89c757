// ── Domain model ──
//
// Canonical types handed to the CLI. Read-only projections of controller
// state: nothing here is cached beyond the call that produced it.

pub mod action;
pub mod device;
pub mod template;

pub use action::{ActionDeviceStatus, ActionId, ActionState, ActionStatus, Outcome};
pub use device::{AttachedDevice, Device};
pub use template::Template;
