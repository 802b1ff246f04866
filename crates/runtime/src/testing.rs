//! Scripted mock collaborators shared by the runtime tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use demolink_protocol::{Credentials, GcStatus, LoginResultCode, MatchRequest};
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::client::{CoordinatorClient, SteamTransport};
use crate::error::{Error, Result};

/// A payload shaped like a coordinator match-info response carrying `url`.
pub(crate) fn payload_with_url(url: &str) -> Value {
    json!({
        "match": {
            "matchid": 1,
            "watchablematchinfo": { "demo_url": url }
        }
    })
}

#[derive(Default)]
pub(crate) struct MockTransport {
    connected: AtomicBool,
    fail_connect: AtomicBool,
    resume_available: AtomicBool,
    fail_resume: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    logouts: AtomicUsize,
    resumes: AtomicUsize,
    login_results: Mutex<VecDeque<LoginResultCode>>,
    login_log: Mutex<Vec<Credentials>>,
}

impl MockTransport {
    /// Starts connected; scripted behaviors are opted into per test.
    pub(crate) fn new() -> Self {
        let mock = Self::default();
        mock.connected.store(true, Ordering::SeqCst);
        mock
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub(crate) fn fail_connects(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_can_resume(&self, available: bool) {
        self.resume_available.store(available, Ordering::SeqCst);
    }

    pub(crate) fn fail_resumes(&self, fail: bool) {
        self.fail_resume.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn push_login_result(&self, result: LoginResultCode) {
        self.login_results.lock().push_back(result);
    }

    pub(crate) fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn disconnect_calls(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub(crate) fn logout_calls(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    pub(crate) fn resume_calls(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_log.lock().len()
    }
}

#[async_trait]
impl SteamTransport for MockTransport {
    async fn connect(&self) -> Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(Error::Client("scripted connect failure".into()));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn run_forever(&self) {
        std::future::pending::<()>().await;
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResultCode> {
        self.login_log.lock().push(credentials.clone());
        Ok(self
            .login_results
            .lock()
            .pop_front()
            .unwrap_or(LoginResultCode::Other(2)))
    }

    async fn logout(&self) -> Result<()> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn can_resume(&self) -> bool {
        self.resume_available.load(Ordering::SeqCst)
    }

    async fn resume(&self) -> Result<()> {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        if self.fail_resume.load(Ordering::SeqCst) {
            return Err(Error::Client("scripted resume failure".into()));
        }
        Ok(())
    }
}

pub(crate) struct MockCoordinator {
    status: Mutex<GcStatus>,
    fail_send: AtomicBool,
    launches: AtomicUsize,
    exits: AtomicUsize,
    sends: AtomicUsize,
    /// Scripted responses for `await_event`; `None` simulates a timeout.
    responses: Mutex<VecDeque<Option<Value>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            status: Mutex::new(GcStatus::NoSession),
            fail_send: AtomicBool::new(false),
            launches: AtomicUsize::new(0),
            exits: AtomicUsize::new(0),
            sends: AtomicUsize::new(0),
            responses: Mutex::new(VecDeque::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_status(&self, status: GcStatus) {
        *self.status.lock() = status;
    }

    pub(crate) fn fail_sends(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn push_response(&self, response: Option<Value>) {
        self.responses.lock().push_back(response);
    }

    pub(crate) fn launch_calls(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub(crate) fn exit_calls(&self) -> usize {
        self.exits.load(Ordering::SeqCst)
    }

    pub(crate) fn send_calls(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    /// Highest number of send→response round trips that were ever open at
    /// once; anything above 1 means the gate failed to serialize.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoordinatorClient for MockCoordinator {
    async fn launch(&self) -> Result<()> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn exit(&self) -> Result<()> {
        self.exits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn connection_status(&self) -> GcStatus {
        *self.status.lock()
    }

    async fn send_match_request(&self, _request: &MatchRequest) -> Result<()> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(Error::Client("scripted send failure".into()));
        }
        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(open, Ordering::SeqCst);
        Ok(())
    }

    async fn await_event(&self, _name: &str, timeout: Duration) -> Result<Option<Value>> {
        let scripted = self.responses.lock().pop_front();
        let result = match scripted {
            Some(Some(payload)) => Some(payload),
            // Scripted timeout (or script exhausted): let the clock run.
            Some(None) | None => {
                tokio::time::sleep(timeout).await;
                None
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(result)
    }
}
