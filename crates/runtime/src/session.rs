//! The logical session facade.
//!
//! [`DemoSession`] is the one-per-process object composing the connection
//! manager, the coordinator manager, and the credential store. It exposes
//! the surface an API layer consumes: resolve a share-code to a demo URL,
//! log in and out, inspect the current user, and spawn the watchdog.

use std::sync::Arc;

use demolink_protocol::{Credentials, LoginResultCode, LoginStatus, sharecode};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::client::{CoordinatorClient, SteamTransport};
use crate::config::SessionConfig;
use crate::connection::ConnectionManager;
use crate::coordinator::CoordinatorManager;
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::extract;
use crate::watchdog::Watchdog;

/// Request attempts per `get_match_url` call. A single coordinator hiccup
/// is common and self-heals after a relaunch; anything longer looks like a
/// systemic outage and retrying would only delay the caller.
const MATCH_INFO_ATTEMPTS: u32 = 2;

pub struct DemoSession {
    transport: Arc<dyn SteamTransport>,
    connection: Arc<ConnectionManager>,
    coordinator: Arc<CoordinatorManager>,
    credentials: Arc<CredentialStore>,
    config: SessionConfig,
}

impl DemoSession {
    pub fn new(
        transport: Arc<dyn SteamTransport>,
        coordinator_client: Arc<dyn CoordinatorClient>,
        config: SessionConfig,
    ) -> Self {
        let connection = Arc::new(ConnectionManager::new(
            Arc::clone(&transport),
            config.reconnect_throttle,
        ));
        let coordinator = Arc::new(CoordinatorManager::new(
            coordinator_client,
            config.relaunch_cooldown,
            config.relaunch_settle,
            config.status_poll_interval,
        ));
        Self {
            transport,
            connection,
            coordinator,
            credentials: Arc::new(CredentialStore::new()),
            config,
        }
    }

    /// Opens the transport session and starts the event pump.
    pub async fn connect(&self) -> Result<()> {
        self.connection.connect().await
    }

    /// Tears the session down. Best-effort.
    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }

    /// Starts the background self-healing loop.
    pub fn spawn_watchdog(&self) -> JoinHandle<()> {
        Watchdog::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.connection),
            Arc::clone(&self.coordinator),
            Arc::clone(&self.credentials),
            self.config.watchdog_interval,
        )
        .spawn()
    }

    /// Resolves a share-code to a downloadable demo URL.
    ///
    /// `Ok(None)` means the coordinator answered but no URL could be mined
    /// from the payload, or both attempts were exhausted. Absence is a
    /// valid outcome, not an error. Errors are limited to
    /// [`Error::Connection`] and [`Error::InvalidShareCode`].
    pub async fn get_match_url(&self, share_code: &str) -> Result<Option<String>> {
        self.connection.ensure_connected().await?;

        let request = sharecode::decode(share_code)?;
        info!(
            target = "demolink.session",
            share_code,
            match_id = request.match_id,
            outcome_id = request.outcome_id,
            token = request.token,
            "requesting match info"
        );

        // Held for the remainder of the call: one logical request at a time.
        let _gate = self.coordinator.gate().lock().await;

        for attempt in 1..=MATCH_INFO_ATTEMPTS {
            self.coordinator
                .ensure_usable(self.config.ensure_usable_timeout)
                .await;

            match self
                .coordinator
                .request_match_info(&request, self.config.gc_timeout)
                .await
            {
                Ok(payload) => {
                    let url = extract::extract(&payload, request.match_id, request.token);
                    match &url {
                        Some(url) => {
                            info!(target = "demolink.session", share_code, %url, "demo url found")
                        }
                        None => {
                            info!(target = "demolink.session", share_code, "no demo url in payload")
                        }
                    }
                    return Ok(url);
                }
                Err(Error::GcTimeout) => {
                    warn!(
                        target = "demolink.session",
                        share_code, attempt, "coordinator timed out"
                    );
                    self.coordinator.relaunch("full_match_info_timeout").await;
                }
                Err(err) => {
                    error!(target = "demolink.session", share_code, %err, "match info request failed");
                    return Ok(None);
                }
            }
        }

        warn!(target = "demolink.session", share_code, "attempts exhausted, giving up");
        Ok(None)
    }

    /// Logs in with the given credentials.
    ///
    /// Challenge requirements are statuses, not errors, so the caller can
    /// collect the missing factor and retry. Credentials are stored only
    /// on success.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        email_code: Option<&str>,
        two_factor_code: Option<&str>,
    ) -> Result<(bool, LoginStatus)> {
        self.connection.ensure_connected().await?;

        info!(target = "demolink.session", username, "logging in");
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
            email_code: email_code.map(str::to_string),
            two_factor_code: two_factor_code.map(str::to_string),
        };

        let code = self
            .transport
            .login(&credentials)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;

        match code {
            LoginResultCode::Ok => {
                info!(target = "demolink.session", username, "login successful");
                self.credentials.store(credentials);
                self.connection.set_login_user(Some(username.to_string()));
                Ok((true, LoginStatus::Success))
            }
            LoginResultCode::AccountLogonDenied => {
                info!(target = "demolink.session", username, "email confirmation required");
                Ok((false, LoginStatus::EmailCodeRequired))
            }
            LoginResultCode::AccountLoginDeniedNeedTwoFactor
            | LoginResultCode::TwoFactorCodeMismatch => {
                info!(target = "demolink.session", username, "two-factor confirmation required");
                Ok((false, LoginStatus::TwoFactorCodeRequired))
            }
            LoginResultCode::TryAnotherCm => {
                warn!(
                    target = "demolink.session",
                    username, "endpoint rejected us, cycling the connection"
                );
                self.connection.disconnect().await;
                self.connection.connect().await?;
                Ok((false, LoginStatus::Failed))
            }
            other => {
                error!(target = "demolink.session", username, ?other, "login failed");
                Ok((false, LoginStatus::Failed))
            }
        }
    }

    /// Clears the login state and logs out of the transport. Best-effort.
    pub async fn logout(&self) {
        self.connection.set_login_user(None);
        self.credentials.clear();
        if let Err(err) = self.transport.logout().await {
            warn!(target = "demolink.session", %err, "transport logout failed");
        }
    }

    /// The currently logged-in user, if any.
    pub fn login_user(&self) -> Option<String> {
        self.connection.login_user()
    }

}
