//! Transport-level connection management.
//!
//! [`ConnectionManager`] owns the logical session to the remote network:
//! the connected flag, the current login user, and the background task
//! pumping inbound events. Reconnects are throttled process-wide so a
//! flapping transport cannot hot-loop reconnect attempts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::SteamTransport;
use crate::error::{Error, Result};

pub struct ConnectionManager {
    transport: Arc<dyn SteamTransport>,
    connected: AtomicBool,
    login_user: Mutex<Option<String>>,
    last_reconnect_attempt: Mutex<Option<Instant>>,
    reconnect_throttle: Duration,
    /// Task driving `run_forever`; aborted on disconnect.
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    pub fn new(transport: Arc<dyn SteamTransport>, reconnect_throttle: Duration) -> Self {
        Self {
            transport,
            connected: AtomicBool::new(false),
            login_user: Mutex::new(None),
            last_reconnect_attempt: Mutex::new(None),
            reconnect_throttle,
            pump: Mutex::new(None),
        }
    }

    /// Opens the transport session and starts the event pump.
    ///
    /// No-op when already connected.
    pub async fn connect(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) && self.transport.is_connected() {
            return Ok(());
        }
        self.open_and_pump().await
    }

    /// Reconnects once if the transport reports disconnected.
    ///
    /// Attempts are throttled to one per `reconnect_throttle` window; a
    /// throttled call while disconnected fails without touching the
    /// transport.
    pub async fn ensure_connected(&self) -> Result<()> {
        let live = self.transport.is_connected();
        self.connected.store(live, Ordering::SeqCst);
        if live {
            return Ok(());
        }

        {
            let mut last = self.last_reconnect_attempt.lock();
            if let Some(at) = *last {
                if at.elapsed() < self.reconnect_throttle {
                    debug!(target = "demolink.connection", "reconnect throttled");
                    return Err(Error::Connection("transport down, reconnect throttled".into()));
                }
            }
            *last = Some(Instant::now());
        }

        warn!(target = "demolink.connection", "transport disconnected, reconnecting");
        self.open_and_pump().await
    }

    /// Stops the event pump and closes the transport.
    ///
    /// Best-effort: failures are logged so teardown always completes.
    pub async fn disconnect(&self) {
        if let Some(pump) = self.pump.lock().take() {
            pump.abort();
        }
        if let Err(err) = self.transport.disconnect().await {
            warn!(target = "demolink.connection", %err, "transport disconnect failed");
        }
        self.connected.store(false, Ordering::SeqCst);
        info!(target = "demolink.connection", "disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn login_user(&self) -> Option<String> {
        self.login_user.lock().clone()
    }

    pub fn set_login_user(&self, user: Option<String>) {
        *self.login_user.lock() = user;
    }

    async fn open_and_pump(&self) -> Result<()> {
        self.transport
            .connect()
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;

        // Replace a finished or missing pump task. An aborted handle stays
        // in the slot until the next (re)connect.
        let mut pump = self.pump.lock();
        let running = pump.as_ref().is_some_and(|h| !h.is_finished());
        if !running {
            let transport = Arc::clone(&self.transport);
            *pump = Some(tokio::spawn(async move {
                transport.run_forever().await;
                debug!(target = "demolink.connection", "event pump ended");
            }));
        }

        self.connected.store(true, Ordering::SeqCst);
        info!(target = "demolink.connection", "transport connected");
        Ok(())
    }
}
