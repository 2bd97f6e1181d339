//! In-process stand-in for the Danube API.
//!
//! # Design
//! A small axum router serves a fixed tool and skill catalog, agent
//! registration, a health check, and stateful webhook CRUD. Every request
//! passes through one middleware that records it, enforces the
//! `danube-api-key` header, and replays any response scripted for its path.
//! Scripts are consumed in order, so a test can queue "503, 503, 200" and
//! count how many attempts arrived.

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Query, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock},
};
use tracing::{debug, info};
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "danube-api-key";
pub const DEFAULT_API_KEY: &str = "dk_test_key";

/// A canned response replayed for the next request to one path.
#[derive(Clone, Debug)]
pub struct ScriptedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub delay: Option<Duration>,
}

impl ScriptedResponse {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
            delay: None,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Hold the response back for `delay` before sending it.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                headers.insert(name, value);
            }
        }
        response
    }
}

/// One request as the server saw it.
#[derive(Clone, Debug, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub events: Vec<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateWebhook {
    pub url: String,
    pub events: Vec<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateWebhook {
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterAgent {
    pub name: String,
    pub operator_email: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

/// Shared server state. Cloning is cheap; all clones see the same data.
#[derive(Clone, Debug)]
pub struct MockState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api_key: String,
    scripts: Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    webhooks: RwLock<HashMap<String, Webhook>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}

impl MockState {
    pub fn new(api_key: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                api_key: api_key.to_string(),
                scripts: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
                webhooks: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Queue `response` for the next request to `path`.
    pub async fn script(&self, path: &str, response: ScriptedResponse) {
        self.inner
            .scripts
            .lock()
            .await
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().await.clone()
    }

    /// Number of requests received for `path`.
    pub async fn hits(&self, path: &str) -> usize {
        self.inner
            .requests
            .lock()
            .await
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    async fn next_script(&self, path: &str) -> Option<ScriptedResponse> {
        self.inner
            .scripts
            .lock()
            .await
            .get_mut(path)
            .and_then(VecDeque::pop_front)
    }
}

/// Handle to a server bound on a random local port.
#[derive(Clone, Debug)]
pub struct MockServer {
    addr: SocketAddr,
    state: MockState,
}

impl MockServer {
    pub async fn start() -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = MockState::default();
        let served = state.clone();
        tokio::spawn(async move { run(listener, served).await });
        Ok(Self { addr, state })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &MockState {
        &self.state
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/tools/search", get(search_tools))
        .route("/v1/tools/call/batch", post(batch_call))
        .route("/v1/tools/call/{id}", post(call_tool))
        .route("/v1/tools/{id}", get(get_tool))
        .route("/v1/skills/search", get(search_skills))
        .route("/v1/skills/{id}", get(get_skill))
        .route("/v1/agents", post(register_agent))
        .route("/v1/webhooks", get(list_webhooks).post(create_webhook))
        .route(
            "/v1/webhooks/{id}",
            axum::routing::patch(update_webhook).delete(delete_webhook),
        )
        .route("/v1/webhooks/{id}/deliveries", get(list_deliveries))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), intercept))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Danube API listening");
    }
    axum::serve(listener, app(state)).await
}

/// Record, authenticate, then either replay a script or route normally.
async fn intercept(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path().to_string();
    let api_key = parts
        .headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.inner.requests.lock().await.push(RecordedRequest {
        method: parts.method.to_string(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        api_key: api_key.clone(),
        body: serde_json::from_slice(&bytes).ok(),
    });
    debug!(method = %parts.method, %path, "request");

    if let Some(script) = state.next_script(&path).await {
        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }
        return script.into_response();
    }

    let public = parts.method == axum::http::Method::POST && path == "/v1/agents";
    if !public && api_key.as_deref() != Some(state.inner.api_key.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid API key"})),
        )
            .into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"})))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub fn tool_catalog() -> Vec<Value> {
    vec![
        json!({
            "id": "3f2b8c1e-7a4d-4e59-9b1a-2c6d8e0f1a23",
            "name": "Send Email",
            "description": "Send an email through Gmail",
            "service_id": "gmail",
            "parameters": {"to": {"type": "string"}, "subject": {"type": "string"}},
            "method": "POST",
            "tags": ["email"],
        }),
        json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "name": "Send Slack Message",
            "description": "Post a message to a Slack channel",
            "service_id": "slack",
            "parameters": {"channel": {"type": "string"}, "text": {"type": "string"}},
            "method": "POST",
            "tags": ["chat"],
        }),
        json!({
            "id": "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
            "name": "Create Issue",
            "description": "Open an issue in a GitHub repository",
            "service_id": "github",
            "parameters": {"repo": {"type": "string"}, "title": {"type": "string"}},
            "method": "POST",
            "is_paid": true,
            "price_per_call_cents": 2,
        }),
    ]
}

pub fn skill_catalog() -> Vec<Value> {
    vec![json!({
        "id": "5e0f4c2a-9b7d-4a1e-8f3c-6d2b1a0e9c7f",
        "name": "pdf-processing",
        "description": "Extract text and tables from PDF files",
        "skill_md": "# PDF processing\n",
        "scripts": [{"name": "extract.py", "content": "print('ok')"}],
    })]
}

fn matching(catalog: Vec<Value>, params: &SearchParams) -> Vec<Value> {
    let query = params.query.as_deref().unwrap_or("").to_lowercase();
    catalog
        .into_iter()
        .filter(|item| {
            item["name"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&query))
        })
        .take(params.limit.unwrap_or(10))
        .collect()
}

async fn search_tools(Query(params): Query<SearchParams>) -> Json<Vec<Value>> {
    Json(matching(tool_catalog(), &params))
}

async fn get_tool(Path(id): Path<String>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    tool_catalog()
        .into_iter()
        .find(|tool| tool["id"] == id.as_str())
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": format!("Tool {id} not found")})),
            )
        })
}

async fn call_tool(
    Path(id): Path<String>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(tool) = tool_catalog().into_iter().find(|tool| tool["id"] == id.as_str()) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"detail": format!("Tool {id} not found")})),
        ));
    };
    Ok(Json(json!({
        "success": true,
        "result": {"echo": input["parameters"].clone()},
        "tool_id": id,
        "tool_name": tool["name"].clone(),
        "duration_ms": 12.5,
        "request_id": Uuid::new_v4().to_string(),
    })))
}

async fn batch_call(Json(input): Json<Value>) -> Json<Value> {
    let known: Vec<Value> = tool_catalog().into_iter().map(|t| t["id"].clone()).collect();
    let results: Vec<Value> = input["calls"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .map(|call| {
            let tool_id = call["tool_id"].clone();
            if known.contains(&tool_id) {
                let echo = call["tool_input"].clone();
                json!({"tool_id": tool_id, "success": true, "result": {"echo": echo}})
            } else {
                json!({"tool_id": tool_id, "success": false, "error": "Tool not found"})
            }
        })
        .collect();
    Json(json!({"results": results}))
}

async fn search_skills(Query(params): Query<SearchParams>) -> Json<Vec<Value>> {
    Json(matching(skill_catalog(), &params))
}

async fn get_skill(Path(id): Path<String>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    skill_catalog()
        .into_iter()
        .find(|skill| skill["id"] == id.as_str())
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({"detail": "Skill not found"}))))
}

async fn register_agent(Json(input): Json<RegisterAgent>) -> (StatusCode, Json<Value>) {
    info!(name = %input.name, email = %input.operator_email, "agent registered");
    (
        StatusCode::CREATED,
        Json(json!({
            "agent_id": Uuid::new_v4().to_string(),
            "api_key": format!("dk_agent_{}", Uuid::new_v4().simple()),
            "wallet_id": Uuid::new_v4().to_string(),
            "deposit_address": "0x0000000000000000000000000000000000000000",
            "registration_url": "https://danubeai.com/agents/claim",
        })),
    )
}

async fn list_webhooks(State(state): State<MockState>) -> Json<Vec<Webhook>> {
    let webhooks = state.inner.webhooks.read().await;
    Json(webhooks.values().cloned().collect())
}

async fn create_webhook(
    State(state): State<MockState>,
    Json(input): Json<CreateWebhook>,
) -> (StatusCode, Json<Value>) {
    let webhook = Webhook {
        id: Uuid::new_v4().to_string(),
        url: input.url,
        events: input.events,
        is_active: true,
        description: input.description,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: None,
    };
    state
        .inner
        .webhooks
        .write()
        .await
        .insert(webhook.id.clone(), webhook.clone());

    let mut body = serde_json::to_value(&webhook).unwrap_or_default();
    body["secret"] = json!(format!("whsec_{}", Uuid::new_v4().simple()));
    (StatusCode::CREATED, Json(body))
}

async fn update_webhook(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateWebhook>,
) -> Result<Json<Webhook>, StatusCode> {
    let mut webhooks = state.inner.webhooks.write().await;
    let webhook = webhooks.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(url) = input.url {
        webhook.url = url;
    }
    if let Some(events) = input.events {
        webhook.events = events;
    }
    if let Some(is_active) = input.is_active {
        webhook.is_active = is_active;
    }
    if let Some(description) = input.description {
        webhook.description = Some(description);
    }
    webhook.updated_at = Some("2026-01-02T00:00:00Z".to_string());
    Ok(Json(webhook.clone()))
}

async fn delete_webhook(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut webhooks = state.inner.webhooks.write().await;
    webhooks
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_deliveries(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    if !state.inner.webhooks.read().await.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(vec![json!({
        "id": Uuid::new_v4().to_string(),
        "webhook_id": id,
        "event_type": "tool.executed",
        "payload": {"tool_id": "3f2b8c1e-7a4d-4e59-9b1a-2c6d8e0f1a23"},
        "status": "delivered",
        "response_status": 200,
        "attempts": 1,
    })]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_serializes_to_json() {
        let webhook = Webhook {
            id: "wh_1".to_string(),
            url: "https://example.com/hook".to_string(),
            events: vec!["tool.executed".to_string()],
            is_active: true,
            description: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: None,
        };
        let json = serde_json::to_value(&webhook).unwrap();
        assert_eq!(json["id"], "wh_1");
        assert_eq!(json["events"][0], "tool.executed");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn update_webhook_all_fields_optional() {
        let input: UpdateWebhook = serde_json::from_str("{}").unwrap();
        assert!(input.url.is_none());
        assert!(input.events.is_none());
        assert!(input.is_active.is_none());
    }

    #[test]
    fn create_webhook_rejects_missing_events() {
        let result: Result<CreateWebhook, _> = serde_json::from_str(r#"{"url":"https://x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn search_matches_substrings_case_insensitively() {
        let params = SearchParams {
            query: Some("SEND".to_string()),
            limit: None,
        };
        assert_eq!(matching(tool_catalog(), &params).len(), 2);

        let params = SearchParams {
            query: Some("send".to_string()),
            limit: Some(1),
        };
        assert_eq!(matching(tool_catalog(), &params).len(), 1);
    }

    #[test]
    fn scripted_response_builder() {
        let script = ScriptedResponse::status(429)
            .header("Retry-After", "12")
            .json(json!({"detail": "slow down"}));
        assert_eq!(script.status, 429);
        assert_eq!(script.headers, vec![("Retry-After".to_string(), "12".to_string())]);
        assert!(script.body.contains("slow down"));
        assert!(script.delay.is_none());
    }
}
