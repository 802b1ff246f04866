//! Collaborator traits for the underlying wire client.
//!
//! The wire protocol to the remote network (handshake, encryption, framing,
//! credential challenges) is out of scope for this crate. The runtime
//! consumes it through these two traits; the session managers are written
//! against them and tests substitute scripted mocks.

use std::time::Duration;

use async_trait::async_trait;
use demolink_protocol::{Credentials, GcStatus, LoginResultCode, MatchRequest};
use serde_json::Value;

use crate::error::Result;

/// Event name carrying the coordinator's match-info response.
pub const FULL_MATCH_INFO_EVENT: &str = "full_match_info";

/// Transport-level session to the remote network.
#[async_trait]
pub trait SteamTransport: Send + Sync + 'static {
    /// Opens the transport session.
    async fn connect(&self) -> Result<()>;

    /// Closes the transport session.
    async fn disconnect(&self) -> Result<()>;

    /// Whether the transport currently reports a live session.
    fn is_connected(&self) -> bool;

    /// Pumps inbound network events until the session ends.
    ///
    /// Runs on a dedicated task owned by the connection manager.
    async fn run_forever(&self);

    /// Submits credentials, returning the remote result code.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResultCode>;

    /// Logs the current user out.
    async fn logout(&self) -> Result<()>;

    /// Whether a session-resume primitive is currently available.
    fn can_resume(&self) -> bool;

    /// Resumes the previous authenticated session without credentials.
    async fn resume(&self) -> Result<()>;
}

/// Sub-client for the game-coordinator session layered on the transport.
#[async_trait]
pub trait CoordinatorClient: Send + Sync + 'static {
    /// Requests a coordinator session handshake.
    async fn launch(&self) -> Result<()>;

    /// Tears the coordinator session down.
    async fn exit(&self) -> Result<()>;

    /// Observed state of the coordinator session.
    fn connection_status(&self) -> GcStatus;

    /// Sends a match-info request for the decoded identifiers.
    async fn send_match_request(&self, request: &MatchRequest) -> Result<()>;

    /// Waits for a named coordinator event.
    ///
    /// Returns `Ok(None)` when `timeout` elapses first. The implementation
    /// owns the wait registration and must release it on timeout so a
    /// later, unrelated response is not misdelivered.
    async fn await_event(&self, name: &str, timeout: Duration) -> Result<Option<Value>>;
}
