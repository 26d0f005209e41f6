use crate::catalog;
use crate::config::Config;
use crate::gemini::{self, AnalyzeError};
use crate::reply::{AnalysisResult, ReplyParser};
use crate::resolver::{self, ResolveError, SourceInput, SourceMode};
use axum::{
    extract::{Json as JsonPayload, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub config: Config,
    pub parser: Arc<dyn ReplyParser>,
    /// One permit: at most one analysis may be in flight at a time.
    pub analysis_gate: Arc<Semaphore>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/models", get(list_models))
        .route("/api/health", get(health))
        .with_state(Arc::new(state))
}

// -------------------------------------------------------------------
// Analyze

#[derive(Deserialize)]
struct AnalyzeRequest {
    mode: SourceMode,
    value: String,
    api_key: String,
    model: Option<String>,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    JsonPayload(payload): JsonPayload<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    // Held until this handler returns, on every exit path.
    let _permit = state
        .analysis_gate
        .clone()
        .try_acquire_owned()
        .map_err(|_| ApiError::conflict("analysis_in_flight", "分析進行中，請稍候再試。"))?;

    // Key shape first: a bad key must not trigger the relay call either.
    gemini::validate_api_key(&payload.api_key)?;

    let input = SourceInput {
        mode: payload.mode,
        value: payload.value,
    };
    let text = resolver::resolve(&state.http, &state.config, &input).await?;

    let model = payload
        .model
        .as_deref()
        .unwrap_or(catalog::DEFAULT_MODEL_ID);
    let result = gemini::analyze(
        &state.http,
        &state.config,
        state.parser.as_ref(),
        &text,
        &payload.api_key,
        model,
    )
    .await?;
    Ok(Json(result))
}

// -------------------------------------------------------------------
// Models

#[derive(Serialize)]
struct ModelsResponse {
    models: Vec<ModelSummary>,
    default: &'static str,
}

#[derive(Serialize)]
struct ModelSummary {
    id: &'static str,
    display_name: &'static str,
}

async fn list_models() -> Json<ModelsResponse> {
    let models = catalog::CATALOG
        .iter()
        .map(|m| ModelSummary {
            id: m.id,
            display_name: m.display_name,
        })
        .collect();
    Json(ModelsResponse {
        models,
        default: catalog::DEFAULT_MODEL_ID,
    })
}

// -------------------------------------------------------------------
// Health

#[derive(Serialize)]
struct HealthInfo {
    service: &'static str,
    version: &'static str,
    relay_base: String,
    gemini_base: String,
    max_content_chars: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthInfo> {
    Json(HealthInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        relay_base: state.config.relay_base.clone(),
        gemini_base: state.config.gemini_base.clone(),
        max_content_chars: state.config.max_content_chars,
    })
}

// -------------------------------------------------------------------
// Errors

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
    fn conflict(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, msg)
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        let (status, code) = match e {
            ResolveError::EmptyText | ResolveError::EmptyUrl => {
                (StatusCode::BAD_REQUEST, "empty_input")
            }
            ResolveError::ContentTooShort => {
                (StatusCode::UNPROCESSABLE_ENTITY, "content_too_short")
            }
            ResolveError::ContentTooLong => (StatusCode::UNPROCESSABLE_ENTITY, "content_too_long"),
            ResolveError::Fetch => (StatusCode::BAD_GATEWAY, "fetch_failed"),
        };
        Self::new(status, code, e.to_string())
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        let (status, code) = match e {
            AnalyzeError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "invalid_api_key"),
            AnalyzeError::Provider(_) => (StatusCode::BAD_GATEWAY, "provider_error"),
            AnalyzeError::MalformedResponse => (StatusCode::BAD_GATEWAY, "malformed_response"),
            AnalyzeError::Transport => (StatusCode::BAD_GATEWAY, "provider_unreachable"),
        };
        Self::new(status, code, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorBody {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
