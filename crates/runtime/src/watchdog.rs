//! Background self-healing loop.
//!
//! The watchdog observes the same connection and coordinator managers the
//! foreground path uses and nudges them back to health: reconnect and
//! re-login when the transport drops, relaunch the coordinator session
//! when it is gone. It never blocks behind a foreground request (the
//! gate is only try-acquired) and a cycle failure is logged, never fatal.

use std::sync::Arc;
use std::time::Duration;

use demolink_protocol::{GcStatus, LoginResultCode};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::SteamTransport;
use crate::connection::ConnectionManager;
use crate::coordinator::CoordinatorManager;
use crate::credentials::CredentialStore;

/// Relogin fallbacks, evaluated in order; first success wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReloginStrategy {
    /// Resume the previous session without credentials, when the client
    /// reports the primitive available.
    ResumeSession,
    /// Replay the stored credentials from the last successful login.
    StoredCredentials,
}

const RELOGIN_ORDER: [ReloginStrategy; 2] =
    [ReloginStrategy::ResumeSession, ReloginStrategy::StoredCredentials];

enum StrategyOutcome {
    Applied,
    /// Preconditions not met; try the next strategy.
    Skipped,
    Failed,
}

pub struct Watchdog {
    transport: Arc<dyn SteamTransport>,
    connection: Arc<ConnectionManager>,
    coordinator: Arc<CoordinatorManager>,
    credentials: Arc<CredentialStore>,
    interval: Duration,
}

impl Watchdog {
    pub fn new(
        transport: Arc<dyn SteamTransport>,
        connection: Arc<ConnectionManager>,
        coordinator: Arc<CoordinatorManager>,
        credentials: Arc<CredentialStore>,
        interval: Duration,
    ) -> Self {
        Self {
            transport,
            connection,
            coordinator,
            credentials,
            interval,
        }
    }

    /// Spawns the loop on its own task. Runs until aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick fires immediately; health is checked right away.
        loop {
            tick.tick().await;
            self.cycle().await;
        }
    }

    /// One observation/recovery pass. Every failure inside is logged and
    /// swallowed so the loop outlives any single bad cycle.
    async fn cycle(&self) {
        if !self.transport.is_connected() {
            warn!(target = "demolink.watchdog", "transport down, recovering");
            match self.connection.ensure_connected().await {
                Ok(()) => self.try_relogin().await,
                Err(err) => {
                    warn!(target = "demolink.watchdog", %err, "reconnect failed, next cycle retries")
                }
            }
        }

        let status = self.coordinator.status();
        if status != GcStatus::HaveSession {
            // Non-blocking: a held gate means a foreground request is in
            // progress and owns recovery for itself.
            match self.coordinator.gate().try_lock() {
                Ok(_guard) => self.coordinator.relaunch(status.label()).await,
                Err(_) => {
                    debug!(target = "demolink.watchdog", "gate busy, skipping coordinator check")
                }
            }
        }
    }

    async fn try_relogin(&self) {
        for strategy in RELOGIN_ORDER {
            match self.apply(strategy).await {
                StrategyOutcome::Applied => {
                    info!(target = "demolink.watchdog", ?strategy, "relogin succeeded");
                    return;
                }
                StrategyOutcome::Skipped => continue,
                StrategyOutcome::Failed => {
                    warn!(target = "demolink.watchdog", ?strategy, "relogin strategy failed");
                }
            }
        }
        debug!(target = "demolink.watchdog", "no relogin strategy applied");
    }

    async fn apply(&self, strategy: ReloginStrategy) -> StrategyOutcome {
        match strategy {
            ReloginStrategy::ResumeSession => {
                if !self.transport.can_resume() {
                    return StrategyOutcome::Skipped;
                }
                match self.transport.resume().await {
                    Ok(()) => StrategyOutcome::Applied,
                    Err(err) => {
                        warn!(target = "demolink.watchdog", %err, "session resume failed");
                        StrategyOutcome::Failed
                    }
                }
            }
            ReloginStrategy::StoredCredentials => {
                let Some(credentials) = self.credentials.get() else {
                    return StrategyOutcome::Skipped;
                };
                match self.transport.login(&credentials).await {
                    Ok(LoginResultCode::Ok) => {
                        self.connection
                            .set_login_user(Some(credentials.username.clone()));
                        StrategyOutcome::Applied
                    }
                    Ok(code) => {
                        warn!(target = "demolink.watchdog", ?code, "credential relogin rejected");
                        StrategyOutcome::Failed
                    }
                    Err(err) => {
                        warn!(target = "demolink.watchdog", %err, "credential relogin failed");
                        StrategyOutcome::Failed
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn run_cycle(&self) {
        self.cycle().await
    }
}
