use std::{
    collections::VecDeque,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    api::{
        client::ApiClient,
        dispatcher::RequestDispatcher,
        transport::{HttpTransport, TransportError, TransportResponse},
    },
    domain::request::OutboundRequest,
    infra::{contracts::SessionExpiredHandler, credential_store::InMemoryCredentialStore},
    ui::terminal::Terminal,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

#[derive(Debug, Default)]
pub struct RecordingExpiryHandler {
    calls: AtomicUsize,
}

impl RecordingExpiryHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionExpiredHandler for RecordingExpiryHandler {
    fn on_session_expired(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Terminal fed from a fixed list of inputs; `None` entries act as EOF.
#[derive(Debug, Default)]
pub struct FakeTerminal {
    inputs: VecDeque<Option<String>>,
    pub output: Vec<String>,
    pub prompts: Vec<String>,
}

impl FakeTerminal {
    pub fn new(inputs: Vec<Option<&str>>) -> Self {
        Self {
            inputs: inputs
                .into_iter()
                .map(|item| item.map(ToOwned::to_owned))
                .collect(),
            ..Self::default()
        }
    }

    pub fn joined_output(&self) -> String {
        self.output.join("\n")
    }
}

impl Terminal for FakeTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_owned());
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_owned());
        Ok(self.inputs.pop_front().flatten())
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompt_line(prompt)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    pub request: OutboundRequest,
    pub authorization: Option<String>,
}

/// Transport that replays queued responses in order and records every call.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    captured: Mutex<Vec<CapturedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(self, status: u16, body: Value) -> Self {
        let body = serde_json::to_vec(&body).expect("json fixture should serialize");
        self.push(Ok(TransportResponse { status, body }))
    }

    pub fn respond_status(self, status: u16) -> Self {
        self.push(Ok(TransportResponse {
            status,
            body: Vec::new(),
        }))
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.push(Err(error))
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.captured
            .lock()
            .expect("capture lock should not be poisoned")
            .clone()
    }

    fn push(self, response: Result<TransportResponse, TransportError>) -> Self {
        self.responses
            .lock()
            .expect("response lock should not be poisoned")
            .push_back(response);
        self
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(
        &self,
        request: &OutboundRequest,
        authorization: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        self.captured
            .lock()
            .expect("capture lock should not be poisoned")
            .push(CapturedRequest {
                request: request.clone(),
                authorization: authorization.map(ToOwned::to_owned),
            });

        let response = self
            .responses
            .lock()
            .expect("response lock should not be poisoned")
            .pop_front()
            .expect("unexpected request: no scripted response left");

        // Keep the request in flight across one scheduler turn.
        tokio::task::yield_now().await;
        response
    }
}

pub struct TestClient {
    pub client: ApiClient,
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<InMemoryCredentialStore>,
    pub handler: Arc<RecordingExpiryHandler>,
}

pub fn test_client(transport: ScriptedTransport) -> TestClient {
    test_client_with_store(transport, InMemoryCredentialStore::default())
}

pub fn test_client_with_store(
    transport: ScriptedTransport,
    store: InMemoryCredentialStore,
) -> TestClient {
    let transport = Arc::new(transport);
    let store = Arc::new(store);
    let handler = Arc::new(RecordingExpiryHandler::default());
    let dispatcher = RequestDispatcher::new(transport.clone(), store.clone(), handler.clone());

    TestClient {
        client: ApiClient::new(dispatcher, 1024 * 1024),
        transport,
        store,
        handler,
    }
}
