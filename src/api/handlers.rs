//! HTTP request handlers

use super::types::{
    ChatRequest, ConfirmRequest, CreateSessionResponse, ErrorResponse, ModelInfo, ModelsResponse,
    ResetResponse, SessionResponse, SuccessResponse,
};
use super::AppState;
use crate::deck::PPTX_CONTENT_TYPE;
use crate::llm::all_models;
use crate::runtime::RuntimeError;
use crate::state_machine::{ConfirmAction, Reply};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions/new", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/delete", post(delete_session))
        // Pipeline steps
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/confirm", post(confirm_search))
        .route("/api/sessions/:id/generate", post(generate_deck))
        .route("/api/sessions/:id/reset", post(reset_session))
        // Artifact
        .route("/api/deck", get(download_deck))
        // Model info
        .route("/api/models", get(list_models))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let session_id = state.sessions.create_session().await?;
    Ok(Json(CreateSessionResponse { session_id }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.snapshot(&id).await?;
    Ok(Json(SessionResponse::new(id, session)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.delete_session(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResetResponse>, AppError> {
    let reply = state.sessions.reset_session(&id).await?;
    Ok(Json(ResetResponse {
        message: reply.reply,
    }))
}

// ============================================================
// Pipeline Steps
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Reply>, AppError> {
    let Json(req) = payload?;
    let reply = state.sessions.handle_message(&id, &req.message).await?;
    Ok(Json(reply))
}

async fn confirm_search(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<Json<Reply>, AppError> {
    let Json(req) = payload?;
    let action = ConfirmAction::parse(&req.action).ok_or_else(|| {
        AppError::BadRequest("action must be 'ok' or 'search_again'".to_string())
    })?;
    let reply = state
        .sessions
        .handle_confirmation(&id, action, req.new_query)
        .await?;
    Ok(Json(reply))
}

async fn generate_deck(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reply>, AppError> {
    let reply = state.sessions.handle_generate_request(&id).await?;
    Ok(Json(reply))
}

// ============================================================
// Artifact
// ============================================================

async fn download_deck(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = match tokio::fs::read(&state.deck_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(
                "No slide deck has been generated yet".to_string(),
            ));
        }
        Err(e) => return Err(AppError::Internal(format!("Failed to read slide deck: {e}"))),
    };

    let file_name = state
        .deck_path
        .file_name()
        .map_or_else(|| "presentation.pptx".into(), |n| n.to_string_lossy());
    let disposition = format!("attachment; filename=\"{file_name}\"");

    Ok((
        [
            (header::CONTENT_TYPE, PPTX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

// ============================================================
// Model Info
// ============================================================

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let registry = &state.llm_registry;
    let mut models: Vec<ModelInfo> = all_models()
        .iter()
        .filter(|m| registry.get(m.id).is_some())
        .map(|m| ModelInfo {
            id: m.id.to_string(),
            provider: m.provider.display_name().to_string(),
            description: m.description.to_string(),
        })
        .collect();

    if !registry.has_provider() {
        models.push(ModelInfo {
            id: registry.default_model_id().to_string(),
            provider: "Offline".to_string(),
            description: "Echoes prompts back; set an API key for real answers".to_string(),
        });
    }

    Json(ModelsResponse {
        models,
        default: registry.default_model_id().to_string(),
    })
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("deckbot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::UnknownSession(_) => AppError::NotFound(e.to_string()),
            e if e.is_usage_error() => AppError::BadRequest(e.to_string()),
            e => {
                tracing::error!(error = %e, "Session request failed");
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmConfig, ModelRegistry};
    use crate::runtime::testing::{hit, TestHarness};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(harness: &TestHarness) -> Router {
        create_router(AppState {
            sessions: harness.manager.clone(),
            llm_registry: Arc::new(ModelRegistry::new(&LlmConfig::default())),
            deck_path: harness.deck_path.clone(),
        })
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn call_json(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = call(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = call_json(app, "POST", "/api/sessions/new", None).await;
        assert_eq!(status, StatusCode::OK);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_new_session_starts_idle() {
        let harness = TestHarness::new();
        let app = app(&harness);
        let id = new_session(&app).await;

        let (status, body) = call_json(&app, "GET", &format!("/api/sessions/{id}"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "idle");
        assert_eq!(body["history"], json!([]));
        assert_eq!(body["options"][0], "Ask me something");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let harness = TestHarness::new();
        let app = app(&harness);

        let (status, body) = call_json(
            &app,
            "POST",
            "/api/sessions/missing/chat",
            Some(json!({"message": "hi"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Session not found: missing");
    }

    #[tokio::test]
    async fn test_empty_message_is_400() {
        let harness = TestHarness::new();
        let app = app(&harness);
        let id = new_session(&app).await;

        let (status, body) = call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({"message": "   "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Empty message");
    }

    #[tokio::test]
    async fn test_confirm_with_nothing_pending_is_400() {
        let harness = TestHarness::new();
        let app = app(&harness);
        let id = new_session(&app).await;

        let (status, body) = call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/confirm"),
            Some(json!({"action": "ok"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nothing to confirm. Start with a chat search.");
    }

    #[tokio::test]
    async fn test_missing_message_is_400() {
        let harness = TestHarness::new();
        let app = app(&harness);
        let id = new_session(&app).await;

        let (status, body) =
            call_json(&app, "POST", &format!("/api/sessions/{id}/chat"), Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Empty message");
    }

    #[tokio::test]
    async fn test_malformed_body_is_400_json() {
        let harness = TestHarness::new();
        let app = app(&harness);
        let id = new_session(&app).await;

        let (status, body) = call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({"message": 42})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_confirm_accepts_any_case_and_padding() {
        for action in ["OK", " ok ", "Ok"] {
            let harness = TestHarness::new();
            harness.chat.queue_reply("search: topic");
            harness.search.queue_hits(vec![hit("a")]);
            let app = app(&harness);
            let id = new_session(&app).await;
            call_json(
                &app,
                "POST",
                &format!("/api/sessions/{id}/chat"),
                Some(json!({"message": "go"})),
            )
            .await;

            let (status, body) = call_json(
                &app,
                "POST",
                &format!("/api/sessions/{id}/confirm"),
                Some(json!({ "action": action })),
            )
            .await;

            assert_eq!(status, StatusCode::OK, "action {action:?}");
            assert_eq!(body["step"], "summarized");
        }
    }

    #[tokio::test]
    async fn test_confirm_unknown_action_is_400() {
        let harness = TestHarness::new();
        harness.chat.queue_reply("search: topic");
        harness.search.queue_hits(vec![hit("a")]);
        let app = app(&harness);
        let id = new_session(&app).await;
        call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({"message": "go"})),
        )
        .await;

        let (status, body) = call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/confirm"),
            Some(json!({"action": "bogus"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "action must be 'ok' or 'search_again'");
        let (_, session) = call_json(&app, "GET", &format!("/api/sessions/{id}"), None).await;
        assert_eq!(session["state"], "awaiting_confirm");
    }

    #[tokio::test]
    async fn test_delete_session_then_404() {
        let harness = TestHarness::new();
        let app = app(&harness);
        let id = new_session(&app).await;

        let (status, body) =
            call_json(&app, "POST", &format!("/api/sessions/{id}/delete"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = call_json(&app, "GET", &format!("/api/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) =
            call_json(&app, "POST", &format!("/api/sessions/{id}/delete"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deck_missing_is_404() {
        let harness = TestHarness::new();
        let app = app(&harness);

        let (status, _) = call(&app, "GET", "/api/deck", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_flow_over_http() {
        let harness = TestHarness::new();
        harness.chat.queue_reply("search: rust async runtimes");
        harness.search.queue_hits(vec![hit("tokio"), hit("smol")]);
        harness.summarizer.set_summary("- tokio is popular\n- smol is small");
        let app = app(&harness);
        let id = new_session(&app).await;

        let (status, body) = call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({"message": "compare async runtimes"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], "awaiting_confirm");
        assert!(body["deck_path"].is_null());

        let (status, body) = call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/confirm"),
            Some(json!({"action": "ok"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], "summarized");
        assert_eq!(body["options"], json!(["Generate slide deck"]));

        let (status, body) =
            call_json(&app, "POST", &format!("/api/sessions/{id}/generate"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["deck_path"].as_str().map(std::path::PathBuf::from),
            Some(harness.deck_path.clone())
        );

        let request = Request::builder()
            .uri("/api/deck")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PPTX_CONTENT_TYPE);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"presentation.pptx\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));

        let (status, body) =
            call_json(&app, "POST", &format!("/api/sessions/{id}/reset"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Reset done");
    }

    #[tokio::test]
    async fn test_requery_with_new_query() {
        let harness = TestHarness::new();
        harness.chat.queue_reply("search: first");
        harness.search.queue_hits(vec![hit("a")]);
        harness.search.queue_hits(vec![hit("b")]);
        let app = app(&harness);
        let id = new_session(&app).await;
        call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/chat"),
            Some(json!({"message": "go"})),
        )
        .await;

        let (status, body) = call_json(
            &app,
            "POST",
            &format!("/api/sessions/{id}/confirm"),
            Some(json!({"action": "search_again", "new_query": "second"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["reply"].as_str().unwrap().contains("Top 1 results for: second"));
        assert_eq!(
            harness.search.recorded_queries(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[tokio::test]
    async fn test_models_lists_offline_fallback() {
        let harness = TestHarness::new();
        let app = app(&harness);

        let (status, body) = call_json(&app, "GET", "/api/models", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default"], "echo");
        assert_eq!(body["models"][0]["id"], "echo");
    }
}
