//! Enums and records shared across the session runtime.

use serde::{Deserialize, Serialize};

/// Observed state of the game-coordinator sub-session.
///
/// Transitions are driven only by observations of the underlying client;
/// the runtime never asserts a state directly, it only issues launch/exit
/// calls and watches this value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GcStatus {
    /// No coordinator session exists.
    NoSession,
    /// A launch was issued and the handshake is in progress.
    Launching,
    /// The coordinator session is established and requests may be sent.
    HaveSession,
}

impl GcStatus {
    /// Short lowercase label used in log fields and relaunch reasons.
    pub fn label(self) -> &'static str {
        match self {
            GcStatus::NoSession => "no_session",
            GcStatus::Launching => "launching",
            GcStatus::HaveSession => "have_session",
        }
    }
}

/// Result code returned by the transport's login call.
///
/// Subset of the remote network's result-code space that the login state
/// machine branches on; everything else collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginResultCode {
    /// Login succeeded.
    Ok,
    /// Denied pending an email confirmation code.
    AccountLogonDenied,
    /// Denied pending a two-factor code.
    AccountLoginDeniedNeedTwoFactor,
    /// A two-factor code was supplied but did not match.
    TwoFactorCodeMismatch,
    /// The endpoint asked us to reconnect elsewhere.
    TryAnotherCm,
    /// Any other result code, carried verbatim for logging.
    Other(i32),
}

/// Login outcome reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginStatus {
    Success,
    Failed,
    EmailCodeRequired,
    TwoFactorCodeRequired,
}

/// Login credentials, stored only after a successful login.
///
/// The challenge codes are kept because a stored credential set is replayed
/// verbatim by the watchdog's auto-relogin path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_factor_code: Option<String>,
}

impl Credentials {
    /// Credentials with no challenge codes.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email_code: None,
            two_factor_code: None,
        }
    }
}
