//! Protocol-level types for the demolink runtime.
//!
//! This crate contains the pure data shared between the session runtime and
//! anything layered on top of it (an HTTP API, the diagnostic CLI):
//!
//! - **Share-codes**: the opaque `CSGO-…` match identifiers and their codec
//! - **Coordinator status**: the observed game-coordinator session state
//! - **Login types**: result codes from the transport and the status enum
//!   reported back to callers
//!
//! Types here are pure data with no behavior beyond (de)serialization and
//! the share-code codec itself. Session logic lives in `demolink-runtime`.

pub mod sharecode;
pub mod types;

pub use sharecode::{MatchRequest, ShareCodeError, decode, encode};
pub use types::{Credentials, GcStatus, LoginResultCode, LoginStatus};
