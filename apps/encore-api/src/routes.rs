use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use encore_service::{
	SearchRequest, SearchResponse, ServiceError, SimilarRequest, SimilarResponse, SweepReport,
	admin, search,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search_events))
		.route("/v1/search/similar", post(search_similar))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/sweep_cache", post(sweep_cache)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_events(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = search::search(&state.service, payload).await?;

	Ok(Json(response))
}

async fn search_similar(
	State(state): State<AppState>,
	Json(payload): Json<SimilarRequest>,
) -> Result<Json<SimilarResponse>, ApiError> {
	let response = search::similar(&state.service, payload).await?;

	Ok(Json(response))
}

async fn sweep_cache(State(state): State<AppState>) -> Result<Json<SweepReport>, ApiError> {
	let response = admin::sweep_cache(&state.service).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Provider { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message),
			ServiceError::Storage { message } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
