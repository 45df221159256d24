//! Pluggable transports that actually move bytes.
//!
//! [`ReqwestTransport`] talks to real endpoints. [`StubTransport`] answers
//! from canned replies and records what it was asked, for tests and offline
//! rendering.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{FetchError, Method, Request, Response};

/// Sends a built request and returns the raw response.
///
/// Implementations must not interpret status codes; that is the gateway's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, default timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        Ok(Response::new(status, headers, body))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::RequestError(e.to_string())
    }
}

/// A canned reply for [`StubTransport`].
#[derive(Debug, Clone)]
pub struct StubReply {
    outcome: StubOutcome,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum StubOutcome {
    Respond { status: u16, body: Vec<u8> },
    Fail(String),
}

impl StubReply {
    /// Reply with a JSON body.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::text(status, body.to_string())
    }

    /// Reply with a raw text body.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: StubOutcome::Respond {
                status,
                body: body.into().into_bytes(),
            },
            delay: None,
        }
    }

    /// Fail as if the connection could not be made.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self {
            outcome: StubOutcome::Fail(message.into()),
            delay: None,
        }
    }

    /// Resolve only after `delay` (tokio time, so paused clocks apply).
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug)]
struct StubRoute {
    method: Method,
    path: String,
    replies: VecDeque<StubReply>,
}

/// Transport that answers from canned replies keyed by method and path
/// (query string ignored).
///
/// Several replies registered for the same route are handed out in order;
/// the last one repeats.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: Mutex<Vec<StubRoute>>,
    requests: Mutex<Vec<Request>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reply for `method` on `path`.
    pub fn on(self, method: Method, path: impl Into<String>, reply: StubReply) -> Self {
        let path = path.into();
        {
            let mut routes = self.routes.lock().unwrap_or_else(|p| p.into_inner());
            match routes
                .iter_mut()
                .find(|r| r.method == method && r.path == path)
            {
                Some(route) => route.replies.push_back(reply),
                None => routes.push(StubRoute {
                    method,
                    path,
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    /// Register a reply for a GET.
    pub fn on_get(self, path: impl Into<String>, reply: StubReply) -> Self {
        self.on(Method::Get, path, reply)
    }

    /// Register a reply for a POST.
    pub fn on_post(self, path: impl Into<String>, reply: StubReply) -> Self {
        self.on(Method::Post, path, reply)
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Requests sent to `path`.
    pub fn requests_to(&self, path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }

    fn next_reply(&self, request: &Request) -> Option<StubReply> {
        let mut routes = self.routes.lock().unwrap_or_else(|p| p.into_inner());
        let route = routes
            .iter_mut()
            .find(|r| r.method == request.method && r.path == request.path())?;
        if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.clone());

        let reply = self.next_reply(&request).ok_or_else(|| {
            FetchError::RequestError(format!(
                "no stub for {} {}",
                request.method.as_str(),
                request.path()
            ))
        })?;

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        match reply.outcome {
            StubOutcome::Respond { status, body } => {
                let mut headers = BTreeMap::new();
                headers.insert("content-type".to_string(), "application/json".to_string());
                Ok(Response::new(status, headers, body))
            }
            StubOutcome::Fail(message) => Err(FetchError::RequestError(message)),
        }
    }
}
