use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{delete, get, post},
};
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;
use tissues_config::ChatModel;
use tissues_service::{
	ChatHistoryResponse, ChatRequest, ChatResponse, Error, ResultsResponse, SearchRequest,
	SearchResponse, SessionStatus, ViewRequest,
};

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
	pub default_model: String,
	pub models: Vec<ChatModel>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message, field } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				message,
				field.map(|field| vec![format!("$.{field}")]),
			),
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::InvalidConfig { message } =>
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message, None),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/models", get(models))
		.route("/v1/sessions", post(create_session))
		.route("/v1/sessions/{session_id}", delete(end_session))
		.route("/v1/sessions/{session_id}/search", post(search))
		.route("/v1/sessions/{session_id}/results", post(results))
		.route("/v1/sessions/{session_id}/chat", get(chat_history).post(chat))
		.route("/v1/sessions/{session_id}/chat/reset", post(reset_chat))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn models(State(state): State<AppState>) -> Json<ModelsResponse> {
	let cfg = &state.service.cfg.chat;

	Json(ModelsResponse { default_model: cfg.default_model.clone(), models: cfg.models.clone() })
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionStatus>) {
	let (_, session) = state.service.sessions.create();
	let status = state.service.session_status(&*session.lock().await);

	(StatusCode::CREATED, Json(status))
}

async fn end_session(
	State(state): State<AppState>,
	Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
	state.service.end_session(session_id)?;

	Ok(StatusCode::NO_CONTENT)
}

async fn search(
	State(state): State<AppState>,
	Path(session_id): Path<Uuid>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let session = state.service.session(session_id)?;
	let mut session = session.lock().await;
	let response = state.service.search(&mut session, payload).await;

	Ok(Json(response))
}

async fn results(
	State(state): State<AppState>,
	Path(session_id): Path<Uuid>,
	Json(payload): Json<ViewRequest>,
) -> Result<Json<ResultsResponse>, ApiError> {
	let session = state.service.session(session_id)?;
	let session = session.lock().await;
	let response = state.service.results(&session, &payload)?;

	Ok(Json(response))
}

async fn chat_history(
	State(state): State<AppState>,
	Path(session_id): Path<Uuid>,
) -> Result<Json<ChatHistoryResponse>, ApiError> {
	let session = state.service.session(session_id)?;
	let session = session.lock().await;

	Ok(Json(state.service.chat_history(&session)))
}

async fn chat(
	State(state): State<AppState>,
	Path(session_id): Path<Uuid>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let session = state.service.session(session_id)?;
	let mut session = session.lock().await;
	let response = state.service.chat(&mut session, payload).await?;

	Ok(Json(response))
}

async fn reset_chat(
	State(state): State<AppState>,
	Path(session_id): Path<Uuid>,
) -> Result<Json<ChatHistoryResponse>, ApiError> {
	let session = state.service.session(session_id)?;
	let mut session = session.lock().await;

	Ok(Json(state.service.reset_chat(&mut session)))
}
