//! demolink runtime: game-coordinator session lifecycle.
//!
//! This crate turns an opaque match share-code into a downloadable demo
//! URL by driving a persistent session to the remote game coordinator:
//!
//! - **Connection management**: transport open/close, the inbound event
//!   pump task, throttled reconnect-on-demand
//! - **Coordinator session management**: launch/relaunch on a cooldown,
//!   readiness polling, and the gate serializing all coordinator access
//! - **Match info requests**: bounded round trips with a two-attempt
//!   retry policy around coordinator timeouts
//! - **URL extraction**: heuristic mining of the demo URL from an
//!   arbitrarily-shaped response payload
//! - **Watchdog**: a background loop that reconnects, re-authenticates,
//!   and relaunches without ever blocking a foreground request
//!
//! # Architecture
//!
//! ```text
//! caller ──▶ DemoSession::get_match_url
//!              │ ensure_connected          ConnectionManager ──▶ SteamTransport
//!              │ decode share-code         demolink-protocol
//!              │ acquire gate ┐
//!              │ ensure_usable│            CoordinatorManager ──▶ CoordinatorClient
//!              │ send + wait  │
//!              │ extract URL ─┘            extract
//!
//! Watchdog ──▶ same managers, try-lock only, on a fixed interval
//! ```
//!
//! The wire protocol itself (handshake, encryption, framing) is out of
//! scope; it is consumed behind the [`client::SteamTransport`] and
//! [`client::CoordinatorClient`] traits.

pub mod client;
pub mod config;
pub mod connection;
pub mod coordinator;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod session;
pub mod watchdog;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CoordinatorClient, FULL_MATCH_INFO_EVENT, SteamTransport};
pub use config::SessionConfig;
pub use connection::ConnectionManager;
pub use coordinator::CoordinatorManager;
pub use credentials::CredentialStore;
pub use error::{Error, Result};
pub use extract::{demo_filename, extract};
pub use session::DemoSession;
pub use watchdog::Watchdog;
