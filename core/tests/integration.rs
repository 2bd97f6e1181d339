//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port and talks to it
//! through the real async transport. The backoff is shrunk to milliseconds
//! so retry paths run quickly; scripted responses drive the failure modes.

use std::sync::Arc;
use std::time::Duration;

use danube_core::{
    ApiError, Backoff, BatchToolCall, Config, CreateWebhook, DanubeClient, Error, ExecuteTool,
    GetSkill, JsonObject, RegisterAgent, StoreCredential, ToolSearch, Transport, UpdateWebhook,
};
use mock_server::{MockServer, ScriptedResponse, DEFAULT_API_KEY};
use serde_json::json;

const SEND_EMAIL_ID: &str = "3f2b8c1e-7a4d-4e59-9b1a-2c6d8e0f1a23";
const SLACK_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
const CREATE_ISSUE_ID: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

fn client_with(base_url: &str, api_key: &str, timeout: Duration, max_retries: u32) -> DanubeClient {
    let config = Config::new(base_url, api_key, timeout, max_retries);
    let transport = Transport::new(config)
        .unwrap()
        .with_backoff(Backoff::new(Duration::from_millis(1), Duration::from_millis(20)));
    DanubeClient::with_transport(transport)
}

async fn setup(max_retries: u32) -> (MockServer, DanubeClient) {
    let server = MockServer::start().await.unwrap();
    let client = client_with(
        &server.url(),
        DEFAULT_API_KEY,
        Duration::from_secs(5),
        max_retries,
    );
    (server, client)
}

fn params(value: serde_json::Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

// --- retry policy ---

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let (server, client) = setup(3).await;
    server.state().script("/v1/health", ScriptedResponse::status(503)).await;
    server.state().script("/v1/health", ScriptedResponse::status(502)).await;

    assert!(client.verify_connection().await);
    assert_eq!(server.state().hits("/v1/health").await, 3);
}

#[tokio::test]
async fn exhausted_gateway_errors_surface_as_api_error() {
    let (server, client) = setup(2).await;
    for _ in 0..3 {
        server
            .state()
            .script("/v1/services/public", ScriptedResponse::status(503))
            .await;
    }

    let err = client.services().list(None, None).await.unwrap_err();
    assert!(matches!(
        err.as_api(),
        Some(ApiError::Api { status: Some(503), .. })
    ));
    assert_eq!(server.state().hits("/v1/services/public").await, 3);
}

#[tokio::test]
async fn exhausted_rate_limit_carries_retry_after() {
    let (server, client) = setup(1).await;
    for _ in 0..2 {
        server
            .state()
            .script(
                "/v1/wallet/balance",
                ScriptedResponse::status(429)
                    .header("Retry-After", "12")
                    .json(json!({"detail": "Slow down"})),
            )
            .await;
    }

    let err = client.wallet().get_balance().await.unwrap_err();
    assert_eq!(
        err.as_api(),
        Some(&ApiError::RateLimit {
            message: "Slow down".to_string(),
            retry_after: Some(12),
        })
    );
    assert_eq!(server.state().hits("/v1/wallet/balance").await, 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let (server, client) = setup(3).await;
    server
        .state()
        .script(
            "/v1/workflows/public",
            ScriptedResponse::status(400).json(json!({"message": "limit too large"})),
        )
        .await;

    let err = client.workflows().list(None, Some(500)).await.unwrap_err();
    assert_eq!(
        err.as_api(),
        Some(&ApiError::Validation {
            message: "limit too large".to_string()
        })
    );
    assert_eq!(server.state().hits("/v1/workflows/public").await, 1);
}

#[tokio::test]
async fn timed_out_attempts_are_retried() {
    let server = MockServer::start().await.unwrap();
    let client = client_with(&server.url(), DEFAULT_API_KEY, Duration::from_millis(200), 1);
    server
        .state()
        .script(
            "/v1/health",
            ScriptedResponse::status(200).delay(Duration::from_secs(2)),
        )
        .await;

    let body = client.transport().get("/v1/health", None).await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
    assert_eq!(server.state().hits("/v1/health").await, 2);
}

#[tokio::test]
async fn backoff_waits_between_attempts() {
    let server = MockServer::start().await.unwrap();
    let config = Config::new(server.url(), DEFAULT_API_KEY, Duration::from_secs(5), 2);
    let transport = Transport::new(config)
        .unwrap()
        .with_backoff(Backoff::new(Duration::from_millis(100), Duration::from_secs(1)));
    let client = DanubeClient::with_transport(transport);
    for _ in 0..2 {
        server.state().script("/v1/health", ScriptedResponse::status(503)).await;
    }

    let started = tokio::time::Instant::now();
    assert!(client.verify_connection().await);
    let elapsed = started.elapsed();

    // 100ms then 200ms.
    assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
    assert_eq!(server.state().hits("/v1/health").await, 3);
}

// --- classification ---

#[tokio::test]
async fn forbidden_with_service_details_needs_configuration() {
    let (server, client) = setup(0).await;
    let path = format!("/v1/tools/call/{SEND_EMAIL_ID}");
    server
        .state()
        .script(
            &path,
            ScriptedResponse::status(403).json(json!({
                "error": {
                    "message": "Gmail is not configured",
                    "details": {"service_id": "gmail", "service_name": "Gmail"}
                }
            })),
        )
        .await;

    let err = client
        .tools()
        .execute(ExecuteTool::by_id(SEND_EMAIL_ID))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_api(),
        Some(&ApiError::ConfigurationRequired {
            message: "Gmail is not configured".to_string(),
            service_id: "gmail".to_string(),
            service_name: "Gmail".to_string(),
        })
    );
}

#[tokio::test]
async fn missing_resource_reports_the_path() {
    let (_server, client) = setup(0).await;
    let err = client
        .tools()
        .get("00000000-0000-0000-0000-000000000000")
        .await
        .unwrap_err();
    match err.as_api() {
        Some(ApiError::NotFound {
            resource,
            identifier,
            message,
        }) => {
            assert_eq!(resource, "Resource");
            assert_eq!(identifier, "/v1/tools/00000000-0000-0000-0000-000000000000");
            assert!(message.contains("not found"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_key_is_an_authentication_error() {
    let server = MockServer::start().await.unwrap();
    let client = client_with(&server.url(), "dk_wrong", Duration::from_secs(5), 3);

    let err = client.identity().get().await.unwrap_err();
    assert_eq!(
        err.as_api(),
        Some(&ApiError::Authentication {
            message: "Invalid API key".to_string()
        })
    );
    assert!(!client.verify_connection().await);
}

#[tokio::test]
async fn empty_success_body_reads_as_empty_record() {
    let (server, client) = setup(0).await;
    server
        .state()
        .script("/v1/credentials/store", ScriptedResponse::status(200))
        .await;

    let stored = client
        .credentials()
        .store(&StoreCredential {
            service_id: "gmail".to_string(),
            credential_type: "api_key".to_string(),
            credential_value: "secret".to_string(),
        })
        .await
        .unwrap();
    assert!(stored.success);
    assert_eq!(stored.service_id, "");
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await.unwrap();
    let client = client_with(&server.url(), DEFAULT_API_KEY, Duration::from_millis(100), 0);
    server
        .state()
        .script(
            "/v1/agents/me",
            ScriptedResponse::status(200).delay(Duration::from_secs(2)),
        )
        .await;

    let err = client.agents().get_info().await.unwrap_err();
    assert_eq!(err.as_api(), Some(&ApiError::timeout(None)));
}

#[tokio::test]
async fn unreachable_host_is_a_connection_error() {
    let client = client_with("http://127.0.0.1:1", DEFAULT_API_KEY, Duration::from_secs(2), 1);
    let err = client.identity().get().await.unwrap_err();
    assert!(matches!(err.as_api(), Some(ApiError::Connection { .. })));
}

// --- request construction ---

#[tokio::test]
async fn absent_query_parameters_are_omitted() {
    let (server, client) = setup(0).await;
    client.services().list(None, None).await.ok();
    client
        .tools()
        .search(
            "issue",
            ToolSearch {
                service_id: Some(String::new()),
                limit: None,
            },
        )
        .await
        .unwrap();

    let recorded = server.state().requests().await;
    assert_eq!(recorded[0].query.as_deref(), Some("limit=10"));
    assert_eq!(recorded[1].query.as_deref(), Some("query=issue&limit=10"));
}

#[tokio::test]
async fn register_is_sent_without_credentials() {
    let (server, client) = setup(0).await;
    let registration = client
        .agents()
        .register(&RegisterAgent {
            name: "scout".to_string(),
            operator_email: "ops@example.com".to_string(),
        })
        .await
        .unwrap();
    assert!(registration.api_key.starts_with("dk_agent_"));
    assert_eq!(registration.balance_usdc, "0");

    client.verify_connection().await;
    let recorded = server.state().requests().await;
    assert_eq!(recorded[0].path, "/v1/agents");
    assert_eq!(recorded[0].api_key, None);
    assert_eq!(recorded[1].api_key.as_deref(), Some(DEFAULT_API_KEY));
}

#[tokio::test]
async fn domain_lookups_are_percent_encoded() {
    let (server, client) = setup(0).await;
    client.sites().get_by_domain("shop.example.com/en").await.ok();

    let recorded = server.state().requests().await;
    assert_eq!(recorded[0].path, "/v1/agent-sites/domain/shop.example.com%2Fen");
}

// --- tools ---

#[tokio::test]
async fn execute_resolves_a_name_through_search() {
    let (server, client) = setup(0).await;
    let result = client
        .tools()
        .execute(
            ExecuteTool::by_name("send slack message")
                .with_parameters(params(json!({"channel": "#ops", "text": "hi"}))),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.tool_name.as_deref(), Some("Send Slack Message"));
    assert_eq!(result.result, Some(json!({"echo": {"channel": "#ops", "text": "hi"}})));
    assert_eq!(server.state().hits("/v1/tools/search").await, 1);
    assert_eq!(
        server.state().hits(&format!("/v1/tools/call/{SLACK_ID}")).await,
        1
    );
}

#[tokio::test]
async fn non_uuid_ids_fall_back_to_search() {
    let (server, client) = setup(0).await;
    let result = client
        .tools()
        .execute(ExecuteTool::by_id(" \"create issue\" "))
        .await
        .unwrap();

    assert_eq!(result.tool_id.as_deref(), Some(CREATE_ISSUE_ID));
    assert_eq!(server.state().hits("/v1/tools/search").await, 1);
}

#[tokio::test]
async fn unknown_names_fail_after_one_search() {
    let (server, client) = setup(0).await;
    let err = client
        .tools()
        .execute(ExecuteTool::by_name("teleport"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ToolNotFound { ref name } if name == "teleport"));
    assert_eq!(server.state().requests().await.len(), 1);
}

#[tokio::test]
async fn execute_without_id_or_name_sends_nothing() {
    let (server, client) = setup(0).await;
    let err = client
        .tools()
        .execute(ExecuteTool::by_name(""))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingArgument { .. }));
    assert!(server.state().requests().await.is_empty());
}

#[tokio::test]
async fn batch_size_is_checked_before_sending() {
    let (server, client) = setup(0).await;

    let err = client.tools().batch_execute(&[]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidBatchSize { len: 0 }));

    let calls: Vec<BatchToolCall> = (0..11).map(|_| BatchToolCall::new(SEND_EMAIL_ID)).collect();
    let err = client.tools().batch_execute(&calls).await.unwrap_err();
    assert!(matches!(err, Error::InvalidBatchSize { len: 11 }));

    assert!(server.state().requests().await.is_empty());
}

#[tokio::test]
async fn batch_results_keep_call_order() {
    let (_server, client) = setup(0).await;
    let calls = vec![
        BatchToolCall::new(SEND_EMAIL_ID).with_input(params(json!({"to": "a@b.c"}))),
        BatchToolCall::new("missing"),
    ];
    let results = client.tools().batch_execute(&calls).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert_eq!(results[0].tool_id, SEND_EMAIL_ID);
    assert!(!results[1].success);
    assert_eq!(results[1].error.as_deref(), Some("Tool not found"));
}

// --- skills ---

#[tokio::test]
async fn skills_resolve_by_name() {
    let (_server, client) = setup(0).await;
    let skill = client
        .skills()
        .get(GetSkill::by_name("PDF-Processing"))
        .await
        .unwrap();
    assert_eq!(skill.name, "pdf-processing");
    assert_eq!(skill.skill_md, "# PDF processing\n");
    assert_eq!(skill.scripts.len(), 1);

    let err = client
        .skills()
        .get(GetSkill::by_name("origami"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SkillNotFound { .. }));
}

// --- webhooks ---

#[tokio::test]
async fn webhook_lifecycle() {
    let (_server, client) = setup(0).await;
    let webhooks = client.webhooks();

    let created = webhooks
        .create(&CreateWebhook {
            url: "https://example.com/hook".to_string(),
            events: vec!["tool.executed".to_string()],
            description: Some("ops".to_string()),
        })
        .await
        .unwrap();
    assert!(created.secret.starts_with("whsec_"));
    assert!(created.webhook.is_active);
    let id = created.webhook.id.clone();

    let updated = webhooks
        .update(
            &id,
            &UpdateWebhook {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(updated.description.as_deref(), Some("ops"));

    assert_eq!(webhooks.list().await.unwrap().len(), 1);
    let deliveries = webhooks.get_deliveries(&id, Some(5)).await.unwrap();
    assert_eq!(deliveries[0].webhook_id, id);

    webhooks.delete(&id).await.unwrap();
    assert!(webhooks.list().await.unwrap().is_empty());

    let err = webhooks.delete(&id).await.unwrap_err();
    assert!(matches!(err.as_api(), Some(ApiError::NotFound { .. })));
}

// --- lifecycle ---

#[tokio::test]
async fn close_cancels_in_flight_calls_and_client_stays_usable() {
    let (server, client) = setup(3).await;
    server
        .state()
        .script(
            "/v1/wallet/balance",
            ScriptedResponse::status(200)
                .json(json!({"balance_cents": 100}))
                .delay(Duration::from_secs(5)),
        )
        .await;

    let client = Arc::new(client);
    let pending = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.wallet().get_balance().await })
    };

    while client.transport().in_flight() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(client.close(), 1);

    let err = pending.await.unwrap().unwrap_err();
    assert_eq!(err.as_api(), Some(&ApiError::cancelled()));
    assert_eq!(client.transport().in_flight(), 0);

    assert!(client.verify_connection().await);
}

#[tokio::test]
async fn close_cancels_every_concurrent_call() {
    let (server, client) = setup(3).await;
    for _ in 0..2 {
        server
            .state()
            .script(
                "/v1/wallet/balance",
                ScriptedResponse::status(200).delay(Duration::from_secs(5)),
            )
            .await;
    }

    let client = Arc::new(client);
    let calls: Vec<_> = (0..2)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.wallet().get_balance().await })
        })
        .collect();

    while client.transport().in_flight() < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(client.close(), 2);

    for call in calls {
        let err = call.await.unwrap().unwrap_err();
        assert_eq!(err.as_api(), Some(&ApiError::cancelled()));
    }
    assert_eq!(client.transport().in_flight(), 0);
}

#[tokio::test]
async fn verify_connection_hits_health() {
    let (server, client) = setup(0).await;
    assert!(client.verify_connection().await);
    let recorded = server.state().requests().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/v1/health");
    assert_eq!(recorded[0].method, "GET");
}
