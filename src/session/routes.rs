//! REST endpoints the presentation layer pulls session state from and pushes
//! user actions to.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::collector::RawAnswers;
use super::manager::SessionManager;
use crate::error::{Error, SessionError};

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionRouteState {
    pub manager: Arc<SessionManager>,
}

/// Error body: `{"error": "..."}` with a status derived from the error kind.
pub struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Session(_) => StatusCode::BAD_REQUEST,
            Error::Llm(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({"error": self.0.to_string()}))).into_response()
    }
}

type SessionPath = Result<Path<Uuid>, PathRejection>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;

fn session_id(path: SessionPath) -> Result<Uuid, SessionError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| SessionError::MalformedRequest(rejection.body_text()))
}

fn json_body<T>(body: JsonBody<T>) -> Result<T, SessionError> {
    body.map(|Json(body)| body)
        .map_err(|rejection| SessionError::MalformedRequest(rejection.body_text()))
}

#[derive(Deserialize)]
struct NavigateRequest {
    stage: String,
}

#[derive(Deserialize)]
struct CareerFocusRequest {
    enabled: bool,
}

#[derive(Deserialize)]
struct PersonalityRequest {
    answers: RawAnswers,
}

#[derive(Deserialize)]
struct SkillsRequest {
    #[serde(default)]
    skills: String,
    #[serde(default)]
    passions: String,
    #[serde(default)]
    availability: String,
    #[serde(default)]
    strengths: String,
}

#[derive(Deserialize)]
struct IdeasRequest {
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    prompt: String,
}

#[derive(Deserialize)]
struct CofounderRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    notes: String,
}

/// GET /health
async fn health(State(state): State<SessionRouteState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.manager.requester().model_name(),
        "sessions": state.manager.session_count().await,
    }))
}

/// POST /api/sessions
async fn create_session(State(state): State<SessionRouteState>) -> impl IntoResponse {
    let snapshot = state.manager.create_session().await;
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /api/sessions/{id}
async fn get_session(
    State(state): State<SessionRouteState>,
    id: SessionPath,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    Ok(Json(state.manager.snapshot(id).await?))
}

/// POST /api/sessions/{id}/navigate
async fn navigate(
    State(state): State<SessionRouteState>,
    id: SessionPath,
    body: JsonBody<NavigateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    let body = json_body(body)?;
    Ok(Json(state.manager.navigate(id, &body.stage).await?))
}

/// POST /api/sessions/{id}/career-focus
async fn career_focus(
    State(state): State<SessionRouteState>,
    id: SessionPath,
    body: JsonBody<CareerFocusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    let body = json_body(body)?;
    Ok(Json(state.manager.set_career_focus(id, body.enabled).await?))
}

/// POST /api/sessions/{id}/personality
async fn personality(
    State(state): State<SessionRouteState>,
    id: SessionPath,
    body: JsonBody<PersonalityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    let body = json_body(body)?;
    Ok(Json(
        state
            .manager
            .complete_personality_test(id, &body.answers)
            .await?,
    ))
}

/// POST /api/sessions/{id}/skills
async fn skills(
    State(state): State<SessionRouteState>,
    id: SessionPath,
    body: JsonBody<SkillsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    let body = json_body(body)?;
    let snapshot = state
        .manager
        .save_skills_passions(
            id,
            &body.skills,
            &body.passions,
            &body.availability,
            &body.strengths,
        )
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{id}/ideas
async fn ideas(
    State(state): State<SessionRouteState>,
    id: SessionPath,
    body: JsonBody<IdeasRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    let body = json_body(body)?;
    let snapshot = state
        .manager
        .generate_ideas(id, body.context.as_deref(), &body.prompt)
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{id}/cofounders
async fn cofounders(
    State(state): State<SessionRouteState>,
    id: SessionPath,
    body: JsonBody<CofounderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    let body = json_body(body)?;
    let snapshot = state
        .manager
        .add_cofounder(id, &body.name, &body.email, &body.notes)
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/{id}/reset
async fn reset(
    State(state): State<SessionRouteState>,
    id: SessionPath,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id(id)?;
    Ok(Json(state.manager.reset(id).await?))
}

/// Build the session REST routes.
pub fn session_routes(state: SessionRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/navigate", post(navigate))
        .route("/api/sessions/{id}/career-focus", post(career_focus))
        .route("/api/sessions/{id}/personality", post(personality))
        .route("/api/sessions/{id}/skills", post(skills))
        .route("/api/sessions/{id}/ideas", post(ideas))
        .route("/api/sessions/{id}/cofounders", post(cofounders))
        .route("/api/sessions/{id}/reset", post(reset))
        .with_state(state)
}
