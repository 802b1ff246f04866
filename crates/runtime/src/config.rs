//! Tunables for the session runtime.

use std::time::Duration;

/// Environment variable overriding the coordinator response timeout, in
/// whole seconds.
pub const GC_TIMEOUT_ENV: &str = "DEMOLINK_GC_TIMEOUT_SEC";

/// Timeouts and intervals governing the session lifecycle.
///
/// The defaults are the values the retry policy in the rest of this crate
/// was designed around; they can be tuned per deployment but there is
/// rarely a reason to.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bound on the wait for a coordinator response to a match request.
    pub gc_timeout: Duration,
    /// Bound on waiting for the coordinator session to become usable.
    pub ensure_usable_timeout: Duration,
    /// Poll interval while waiting for the coordinator session.
    pub status_poll_interval: Duration,
    /// Minimum spacing between two coordinator relaunches.
    pub relaunch_cooldown: Duration,
    /// Pause between exit() and launch() during a relaunch.
    pub relaunch_settle: Duration,
    /// Minimum spacing between transport reconnect attempts, process-wide.
    pub reconnect_throttle: Duration,
    /// Watchdog loop interval.
    pub watchdog_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gc_timeout: Duration::from_secs(30),
            ensure_usable_timeout: Duration::from_secs(20),
            status_poll_interval: Duration::from_millis(200),
            relaunch_cooldown: Duration::from_secs(5),
            relaunch_settle: Duration::from_millis(500),
            reconnect_throttle: Duration::from_secs(2),
            watchdog_interval: Duration::from_secs(5),
        }
    }
}

impl SessionConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(GC_TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.gc_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    target = "demolink",
                    value = %raw,
                    "ignoring unparseable {GC_TIMEOUT_ENV}"
                ),
            }
        }
        config
    }
}
