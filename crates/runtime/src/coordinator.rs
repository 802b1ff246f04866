//! Coordinator session management.
//!
//! [`CoordinatorManager`] owns the sub-session to the game coordinator:
//! it observes the client's status, launches the session on demand, and
//! relaunches it on a cooldown when recovery is needed. The `gate` is the
//! single serialization point for the whole runtime: exactly one logical
//! coordinator request (or a watchdog relaunch) may be outstanding at a
//! time.

use std::sync::Arc;
use std::time::Duration;

use demolink_protocol::{GcStatus, MatchRequest};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::{CoordinatorClient, FULL_MATCH_INFO_EVENT};
use crate::error::{Error, Result};

pub struct CoordinatorManager {
    client: Arc<dyn CoordinatorClient>,
    /// Serializes coordinator requests and relaunches. Held by the
    /// requester for the whole logical call; the watchdog only try-locks.
    gate: tokio::sync::Mutex<()>,
    /// Timestamp of the last relaunch. Written only while the gate is held.
    last_relaunch: Mutex<Option<Instant>>,
    relaunch_cooldown: Duration,
    relaunch_settle: Duration,
    status_poll_interval: Duration,
}

impl CoordinatorManager {
    pub fn new(
        client: Arc<dyn CoordinatorClient>,
        relaunch_cooldown: Duration,
        relaunch_settle: Duration,
        status_poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            gate: tokio::sync::Mutex::new(()),
            last_relaunch: Mutex::new(None),
            relaunch_cooldown,
            relaunch_settle,
            status_poll_interval,
        }
    }

    /// The request-serialization gate.
    pub fn gate(&self) -> &tokio::sync::Mutex<()> {
        &self.gate
    }

    /// Current coordinator status as observed from the client.
    pub fn status(&self) -> GcStatus {
        self.client.connection_status()
    }

    /// Makes a best effort to get the coordinator session usable.
    ///
    /// Returns immediately on `HaveSession`; otherwise issues a launch and
    /// polls the observed status until it flips or `timeout` elapses. A
    /// timeout is logged, not an error, so callers must not assume
    /// readiness.
    pub async fn ensure_usable(&self, timeout: Duration) {
        let status = self.status();
        if status == GcStatus::HaveSession {
            debug!(target = "demolink.gc", "coordinator session already up");
            return;
        }

        info!(
            target = "demolink.gc",
            status = status.label(),
            "coordinator session not ready, launching"
        );
        if let Err(err) = self.client.launch().await {
            warn!(target = "demolink.gc", %err, "launch request failed");
        }

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(
                    target = "demolink.gc",
                    status = self.status().label(),
                    "coordinator session still not ready after {timeout:?}"
                );
                return;
            }
            tokio::time::sleep(self.status_poll_interval.min(remaining)).await;
            if self.status() == GcStatus::HaveSession {
                info!(target = "demolink.gc", "coordinator session established");
                return;
            }
        }
    }

    /// Tears the coordinator session down and launches it again.
    ///
    /// No-op inside the cooldown window since the last relaunch, whoever
    /// the caller was. Relaunch is itself a recovery action, so client
    /// failures are swallowed and logged rather than raised. Callers must
    /// hold the gate.
    pub async fn relaunch(&self, reason: &str) {
        {
            let mut last = self.last_relaunch.lock();
            if let Some(at) = *last {
                if at.elapsed() < self.relaunch_cooldown {
                    debug!(target = "demolink.gc", reason, "relaunch skipped, inside cooldown");
                    return;
                }
            }
            *last = Some(Instant::now());
        }

        info!(target = "demolink.gc", reason, "relaunching coordinator session");
        if let Err(err) = self.client.exit().await {
            warn!(target = "demolink.gc", %err, "coordinator exit failed");
        }
        tokio::time::sleep(self.relaunch_settle).await;
        if let Err(err) = self.client.launch().await {
            warn!(target = "demolink.gc", %err, "coordinator launch failed");
        }
    }

    /// One request/response round trip, bounded by `timeout`.
    ///
    /// A lapsed wait surfaces as [`Error::GcTimeout`] for the requester's
    /// retry loop. Callers must hold the gate.
    pub async fn request_match_info(
        &self,
        request: &MatchRequest,
        timeout: Duration,
    ) -> Result<Value> {
        self.client.send_match_request(request).await?;
        match self.client.await_event(FULL_MATCH_INFO_EVENT, timeout).await? {
            Some(payload) => Ok(payload),
            None => Err(Error::GcTimeout),
        }
    }
}
