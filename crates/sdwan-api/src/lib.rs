// sdwan-api: Async Rust client for the SD-WAN controller (vManage) REST API
//
// The controller speaks a cookie + XSRF-token session protocol. `Client::login`
// performs the two-step handshake and hands back an explicit `Session` value;
// every endpoint method takes that session by reference.

pub mod actions;
pub mod client;
pub mod devices;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod session;
pub mod templates;
pub mod transport;

pub use client::Client;
pub use endpoint::Endpoint;
pub use error::Error;
pub use session::{Credentials, Session};
pub use transport::{TlsMode, TransportConfig};
