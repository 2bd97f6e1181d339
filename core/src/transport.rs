//! Async HTTP transport for the Danube API.
//!
//! # Overview
//! `Transport` issues one logical call per verb method. A logical call is a
//! loop of attempts: each attempt races the exchange against the configured
//! timeout and against the call's cancellation token. Rate-limit and gateway
//! statuses, network faults, and timeouts are reissued after an exponential
//! backoff until the retry budget is spent. Whatever is left over is returned
//! as a single `ApiError`.
//!
//! # Cancellation
//! Every logical call registers its own token in an in-flight registry for
//! the duration of the call, so `close` cancels all outstanding calls rather
//! than only the most recent one. A cancelled call resolves as a timeout-class
//! error and is not retried. Calls started after `close` are unaffected.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, warn, Instrument};
use url::Url;

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{self, HttpMethod, HttpResponse, QueryParams, RequestDescriptor};

/// Header carrying the credential on authenticated requests.
pub const API_KEY_HEADER: &str = "danube-api-key";

const USER_AGENT: &str = concat!("danube-rs/", env!("CARGO_PKG_VERSION"));

/// Exponential backoff: attempt `n` waits `min(unit * 2^n, cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    unit: Duration,
    cap: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            unit: Duration::from_secs(1),
            cap: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    pub fn new(unit: Duration, cap: Duration) -> Self {
        Self { unit, cap }
    }

    /// Delay before retry attempt `attempt` (0-indexed).
    pub fn delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.unit.checked_mul(factor))
            .map_or(self.cap, |delay| delay.min(self.cap))
    }
}

/// Cancellation tokens of the calls currently in flight, keyed per call.
#[derive(Debug, Default)]
struct InFlight {
    next_id: AtomicU64,
    tokens: Mutex<HashMap<u64, CancellationToken>>,
}

impl InFlight {
    fn register(&self) -> InFlightGuard<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, token.clone());
        InFlightGuard {
            registry: self,
            id,
            token,
        }
    }

    fn cancel_all(&self) -> usize {
        let drained: Vec<CancellationToken> = self
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, token)| token)
            .collect();
        for token in &drained {
            token.cancel();
        }
        drained.len()
    }

    fn len(&self) -> usize {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Removes its token from the registry on every exit path of a call.
struct InFlightGuard<'a> {
    registry: &'a InFlight,
    id: u64,
    token: CancellationToken,
}

impl InFlightGuard<'_> {
    fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Result of a single attempt.
enum Attempt {
    Done(Value),
    Retry(ApiError),
    Fail(ApiError),
}

/// Shared HTTP transport. Configuration is immutable after construction.
#[derive(Debug)]
pub struct Transport {
    config: Config,
    http: reqwest::Client,
    backoff: Backoff,
    in_flight: InFlight,
}

impl Transport {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http,
            backoff: Backoff::default(),
            in_flight: InFlight::default(),
        })
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn get(&self, path: &str, query: Option<QueryParams>) -> Result<Value, ApiError> {
        self.request(RequestDescriptor::new(HttpMethod::Get, path).query(query))
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        query: Option<QueryParams>,
    ) -> Result<Value, ApiError> {
        self.request(
            RequestDescriptor::new(HttpMethod::Post, path)
                .body(body)
                .query(query),
        )
        .await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(RequestDescriptor::new(HttpMethod::Put, path).body(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(RequestDescriptor::new(HttpMethod::Patch, path).body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(RequestDescriptor::new(HttpMethod::Delete, path))
            .await
    }

    /// POST without the credential header.
    pub async fn public_post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(
            RequestDescriptor::new(HttpMethod::Post, path)
                .body(body)
                .unauthenticated(),
        )
        .await
    }

    /// Issue one logical call, retrying transient failures.
    pub async fn request(&self, req: RequestDescriptor) -> Result<Value, ApiError> {
        let span = debug_span!("request", method = req.method.as_str(), path = %req.path);
        self.execute(req).instrument(span).await
    }

    /// Cancel every call currently in flight. Returns how many were cancelled.
    pub fn close(&self) -> usize {
        let cancelled = self.in_flight.cancel_all();
        debug!(cancelled, "transport closed");
        cancelled
    }

    /// Number of logical calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    async fn execute(&self, req: RequestDescriptor) -> Result<Value, ApiError> {
        let url = http::build_url(self.config.base_url(), &req.path, req.query.as_ref())?;
        let guard = self.in_flight.register();
        let mut retries = 0;

        loop {
            debug!(attempt = retries, "sending request");
            let err = match self.attempt(&req, &url, guard.token()).await {
                Attempt::Done(value) => return Ok(value),
                Attempt::Fail(err) => return Err(err),
                Attempt::Retry(err) => err,
            };
            if retries >= self.config.max_retries() {
                return Err(err);
            }

            let delay = self.backoff.delay(retries);
            warn!(
                attempt = retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying request"
            );
            tokio::select! {
                biased;
                _ = guard.token().cancelled() => return Err(ApiError::cancelled()),
                _ = tokio::time::sleep(delay) => {}
            }
            retries += 1;
        }
    }

    async fn attempt(
        &self,
        req: &RequestDescriptor,
        url: &Url,
        token: &CancellationToken,
    ) -> Attempt {
        let mut builder = self
            .http
            .request(req.method.into(), url.clone())
            .header(CONTENT_TYPE, "application/json");
        if req.authenticated {
            builder = builder.header(API_KEY_HEADER, self.config.api_key());
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(HttpResponse {
                status,
                headers,
                body,
            })
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => return Attempt::Fail(ApiError::cancelled()),
            outcome = tokio::time::timeout(self.config.timeout(), exchange) => outcome,
        };

        match outcome {
            Err(_elapsed) => Attempt::Retry(ApiError::timeout(None)),
            Ok(Err(err)) => classify_fault(err),
            Ok(Ok(response)) if response.is_success() => Attempt::Done(response.json_or_empty()),
            Ok(Ok(response)) => {
                let err = http::classify(&response, &req.path);
                if ApiError::is_retryable_status(response.status) {
                    Attempt::Retry(err)
                } else {
                    Attempt::Fail(err)
                }
            }
        }
    }
}

/// Sort a transport-level fault into retryable network trouble or a
/// terminal unexpected error.
fn classify_fault(err: reqwest::Error) -> Attempt {
    if err.is_timeout() {
        debug!(error = %err, "request timed out");
        Attempt::Retry(ApiError::timeout(None))
    } else if err.is_connect() || err.is_request() || err.is_body() {
        debug!(error = %err, "network failure");
        Attempt::Retry(ApiError::connection(None))
    } else {
        Attempt::Fail(ApiError::unexpected(err.to_string()))
    }
}
