//! Integration tests for the session REST surface and the HTTP collaborator
//! client.
//!
//! Router tests drive the real axum router with `oneshot`. Client tests spin
//! up a stub chat-completions server on a random port.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

use collab_align::error::LlmError;
use collab_align::llm::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
    OpenAiProvider, UnconfiguredProvider,
};
use collab_align::session::{
    AlignmentRequester, ManagerOptions, PersonalityTrait, RawAnswers, SessionManager,
    SessionRouteState, session_routes,
};

/// Stub LLM provider (no real API calls).
struct StubLlm;

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: "Summary: stub insight".to_string(),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
            response_id: None,
        })
    }
}

fn app_with(llm: Arc<dyn LlmProvider>) -> Router {
    let manager = Arc::new(SessionManager::new(
        AlignmentRequester::new(llm, 0.7),
        ManagerOptions::default(),
    ));
    session_routes(SessionRouteState { manager })
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn all_answers(value: i64) -> Value {
    let map: serde_json::Map<String, Value> = PersonalityTrait::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), json!(value)))
        .collect();
    Value::Object(map)
}

async fn new_session(app: &Router) -> String {
    let (status, body) = call(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

// ── Router ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_model() {
    let app = app_with(Arc::new(StubLlm));
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "stub");
    assert_eq!(body["sessions"], 0);

    new_session(&app).await;
    let (_, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(body["sessions"], 1);
}

#[tokio::test]
async fn full_flow_through_every_stage() {
    let app = app_with(Arc::new(StubLlm));
    let id = new_session(&app).await;

    let (_, snap) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(snap["stage"], "welcome");
    assert_eq!(snap["progress"], 0);
    assert_eq!(snap["credentials_configured"], false);

    let (status, snap) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/navigate"),
        Some(json!({"stage": "test"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["progress"], 25);

    let (status, snap) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/personality"),
        Some(json!({"answers": all_answers(4)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["stage"], "skills");
    assert_eq!(snap["progress"], 25);
    assert_eq!(snap["alignment"], "Summary: stub insight");
    assert_eq!(snap["shared_user_count"], 1);
    assert_eq!(snap["responses"]["openness"], 4);

    let (_, snap) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/skills"),
        Some(json!({
            "skills": "a, b ,,c",
            "passions": "x,, y",
            "availability": "10",
            "strengths": "focus"
        })),
    )
    .await;
    assert_eq!(snap["skills_passions"]["skills"], json!(["a", "b", "c"]));
    assert_eq!(snap["skills_passions"]["passions"], json!(["x", "y"]));

    call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/career-focus"),
        Some(json!({"enabled": true})),
    )
    .await;
    let (status, snap) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/ideas"),
        Some(json!({"prompt": "AI careers"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snap["ideas"], json!(["Summary: stub insight"]));
    assert_eq!(snap["mode_caption"], "Career-focused (resilience, employability)");

    let (_, snap) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/cofounders"),
        Some(json!({"name": "Ada", "email": "whatever", "notes": "infra"})),
    )
    .await;
    assert_eq!(snap["cofounders"][0]["email"], "whatever");

    // The override pinned at test completion still wins.
    let (_, snap) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/navigate"),
        Some(json!({"stage": "cofounders"})),
    )
    .await;
    assert_eq!(snap["progress"], 25);
}

#[tokio::test]
async fn invalid_stage_is_bad_request() {
    let app = app_with(Arc::new(StubLlm));
    let id = new_session(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/navigate"),
        Some(json!({"stage": "dashboard"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("dashboard"));
}

#[tokio::test]
async fn out_of_range_answers_are_rejected() {
    let app = app_with(Arc::new(StubLlm));
    let id = new_session(&app).await;

    let mut answers = all_answers(3);
    answers["econ_vibe"] = json!(7);
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/personality"),
        Some(json!({"answers": answers})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("econ_vibe"));

    let (_, snap) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(snap["responses"], json!({}));
    assert_eq!(snap["stage"], "welcome");
}

#[tokio::test]
async fn degraded_collaborator_falls_back_for_alignment_only() {
    let app = app_with(Arc::new(UnconfiguredProvider::new("gpt-5")));
    let id = new_session(&app).await;

    let (status, snap) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/personality"),
        Some(json!({"answers": all_answers(2)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let alignment = snap["alignment"].as_str().unwrap();
    assert!(alignment.contains("Summary:"));
    assert!(alignment.contains("Startup"));

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/ideas"),
        Some(json!({"prompt": "anything"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().starts_with("LLM error"));

    let (_, snap) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(snap["ideas"], json!([]));
}

#[tokio::test]
async fn reset_issues_new_session() {
    let app = app_with(Arc::new(StubLlm));
    let id = new_session(&app).await;
    call(
        &app,
        "POST",
        &format!("/api/sessions/{id}/cofounders"),
        Some(json!({"name": "Ada"})),
    )
    .await;

    let (status, snap) = call(&app, "POST", &format!("/api/sessions/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    let new_id = snap["session_id"].as_str().unwrap();
    assert_ne!(new_id, id);
    assert_eq!(snap["stage"], "welcome");
    assert_eq!(snap["cofounders"], json!([]));
    assert!(snap["share_link"].as_str().unwrap().ends_with(new_id));

    let (status, _) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_answer_values_are_bad_request_json() {
    let app = app_with(Arc::new(StubLlm));
    let id = new_session(&app).await;

    for value in [json!(3.5), json!("high")] {
        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/sessions/{id}/personality"),
            Some(json!({"answers": {"openness": value}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Malformed request")
        );
    }

    let (_, snap) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(snap["responses"], json!({}));
}

#[tokio::test]
async fn non_uuid_session_path_is_bad_request_json() {
    let app = app_with(Arc::new(StubLlm));

    let (status, body) = call(
        &app,
        "POST",
        "/api/sessions/not-a-uuid/navigate",
        Some(json!({"stage": "test"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed request"));

    let (status, body) = call(&app, "GET", "/api/sessions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// ── HTTP client against a stub chat-completions server ───────────────

/// Start a stub chat-completions server that replies with `reply` and the
/// given status. Returns its base URL.
async fn start_stub_server(status: StatusCode, reply: Value) -> String {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(body): Json<Value>| {
            let reply = reply.clone();
            async move {
                // Echo the model so the test can check the request shape.
                let mut reply = reply;
                if let Some(obj) = reply.as_object_mut() {
                    obj.insert("echo_model".into(), body["model"].clone());
                    obj.insert("echo_roles".into(), json!(
                        body["messages"]
                            .as_array()
                            .map(|m| m.iter().map(|x| x["role"].clone()).collect::<Vec<_>>())
                            .unwrap_or_default()
                    ));
                }
                (status, Json(reply))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}/v1")
}

fn provider_for(base_url: &str) -> OpenAiProvider {
    OpenAiProvider::new(
        SecretString::from("sk-test".to_string()),
        "gpt-test",
        base_url,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn client_reads_message_content() {
    let base = start_stub_server(
        StatusCode::OK,
        json!({
            "id": "chatcmpl-42",
            "choices": [{"message": {"role": "assistant", "content": "Summary: hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 7, "completion_tokens": 2}
        }),
    )
    .await;

    let response = provider_for(&base)
        .complete(
            CompletionRequest::new(vec![ChatMessage::system("s"), ChatMessage::user("u")])
                .with_temperature(0.7),
        )
        .await
        .unwrap();

    assert_eq!(response.content, "Summary: hi");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.input_tokens, 7);
    assert_eq!(response.response_id.as_deref(), Some("chatcmpl-42"));
}

#[tokio::test]
async fn client_without_text_returns_raw_body() {
    let base = start_stub_server(StatusCode::OK, json!({"choices": []})).await;

    let response = provider_for(&base)
        .complete(CompletionRequest::new(vec![ChatMessage::user("u")]))
        .await
        .unwrap();

    let raw: Value = serde_json::from_str(&response.content).unwrap();
    assert_eq!(raw["echo_model"], "gpt-test");
    assert_eq!(raw["echo_roles"], json!(["user"]));
}

#[tokio::test]
async fn client_maps_auth_failure() {
    let base = start_stub_server(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key"}}),
    )
    .await;

    let err = provider_for(&base)
        .complete(CompletionRequest::new(vec![ChatMessage::user("u")]))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::AuthFailed { .. }));
}

#[tokio::test]
async fn alignment_over_http_falls_back_on_server_error() {
    let base = start_stub_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "boom"}),
    )
    .await;
    let requester = AlignmentRequester::new(Arc::new(provider_for(&base)), 0.7);
    let app_manager = SessionManager::new(requester, ManagerOptions::default());

    let id = app_manager.create_session().await.session_id;
    let answers: RawAnswers = PersonalityTrait::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), 3))
        .collect();
    let snap = app_manager
        .complete_personality_test(id, &answers)
        .await
        .unwrap();

    assert!(snap.alignment.starts_with("Summary:"));
    assert!(snap.alignment.contains("HTTP 500"));
}
