use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use modelhub_protocol::records::DEFAULT_PROVIDER;
use modelhub_protocol::{
    ApiKeyCreate, ApiKeyRecord, AudioRequest, ChatRequest, ClassifiedError, ErrorEnvelope,
    ImageRequest, StatusCheck, StatusCheckCreate, Tier, VideoRequest,
};
use modelhub_storage::{entities, DbErr};

use crate::core::CoreState;

/// Local (non-upstream) failure of a bookkeeping route. Generation routes
/// never return this; they fold everything into the 200 error envelope.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        error!(event = "storage_error", error = %err, "database operation failed");
        Self::internal(format!("database error: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "AI Models Hub API" }))
}

pub async fn create_status_check(
    State(state): State<Arc<CoreState>>,
    Json(input): Json<StatusCheckCreate>,
) -> Result<Json<StatusCheck>, ApiError> {
    let record = state.storage.insert_status_check(&input.client_name).await?;
    Ok(Json(status_to_wire(record)))
}

pub async fn list_status_checks(
    State(state): State<Arc<CoreState>>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    let records = state.storage.list_status_checks().await?;
    Ok(Json(records.into_iter().map(status_to_wire).collect()))
}

pub async fn save_api_key(
    State(state): State<Arc<CoreState>>,
    Json(input): Json<ApiKeyCreate>,
) -> Result<Json<ApiKeyRecord>, ApiError> {
    let record = state
        .storage
        .save_api_key(&input.api_key, &input.provider)
        .await?;
    Ok(Json(api_key_to_wire(record)))
}

pub async fn get_api_key(
    State(state): State<Arc<CoreState>>,
    Path(provider): Path<String>,
) -> Result<Json<Option<ApiKeyRecord>>, ApiError> {
    let record = state.storage.get_api_key(&provider).await?;
    Ok(Json(record.map(api_key_to_wire)))
}

pub async fn delete_api_key(
    State(state): State<Arc<CoreState>>,
    Path(provider): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.storage.delete_api_keys(&provider).await?;
    Ok(Json(json!({ "deleted_count": deleted })))
}

pub async fn models_for_tier(
    State(state): State<Arc<CoreState>>,
    Path(tier): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(tier) = Tier::parse(&tier) else {
        return Err(ApiError::bad_request(format!(
            "unknown tier '{tier}', expected one of free, basic, pro"
        )));
    };
    match state.upstream.fetch_tier(tier).await {
        Ok(body) => Ok(Json(body)),
        Err(err) => Err(ApiError::internal(format!("Error fetching models: {err}"))),
    }
}

pub async fn all_models(
    State(state): State<Arc<CoreState>>,
) -> Json<modelhub_protocol::AggregatedCatalog> {
    Json(state.upstream.fetch_all().await)
}

pub async fn chat(State(state): State<Arc<CoreState>>, Json(request): Json<ChatRequest>) -> Response {
    let api_key = match credential_for(&state, request.api_key.as_deref()).await {
        Ok(Some(key)) => key,
        Ok(None) => return no_api_key_response(),
        Err(envelope) => return Json(envelope).into_response(),
    };
    match state.upstream.chat(&request, &api_key).await {
        Ok(reply) => Json(reply).into_response(),
        Err(envelope) => Json(envelope).into_response(),
    }
}

pub async fn generate_image(
    State(state): State<Arc<CoreState>>,
    Json(request): Json<ImageRequest>,
) -> Response {
    let api_key = match credential_for(&state, request.api_key.as_deref()).await {
        Ok(Some(key)) => key,
        Ok(None) => return no_api_key_response(),
        Err(envelope) => return Json(envelope).into_response(),
    };
    match state.upstream.generate_image(&request, &api_key).await {
        Ok(reply) => Json(reply).into_response(),
        Err(envelope) => Json(envelope).into_response(),
    }
}

pub async fn generate_audio(
    State(state): State<Arc<CoreState>>,
    Json(request): Json<AudioRequest>,
) -> Response {
    let api_key = match credential_for(&state, request.api_key.as_deref()).await {
        Ok(Some(key)) => key,
        Ok(None) => return no_api_key_response(),
        Err(envelope) => return Json(envelope).into_response(),
    };
    match state.upstream.generate_audio(&request, &api_key).await {
        Ok(reply) => Json(reply).into_response(),
        Err(envelope) => Json(envelope).into_response(),
    }
}

pub async fn generate_video(
    State(state): State<Arc<CoreState>>,
    Json(request): Json<VideoRequest>,
) -> Response {
    let api_key = match credential_for(&state, request.api_key.as_deref()).await {
        Ok(Some(key)) => key,
        Ok(None) => return no_api_key_response(),
        Err(envelope) => return Json(envelope).into_response(),
    };
    match state.upstream.generate_video(&request, &api_key).await {
        Ok(reply) => Json(reply).into_response(),
        Err(envelope) => Json(envelope).into_response(),
    }
}

/// Inline key wins; otherwise the stored credential for the fixed provider.
/// A storage failure here folds into the generation error envelope, since
/// generation routes always answer 200.
async fn credential_for(
    state: &CoreState,
    inline: Option<&str>,
) -> Result<Option<String>, ErrorEnvelope> {
    if let Some(key) = inline
        && !key.is_empty()
    {
        return Ok(Some(key.to_string()));
    }
    match state.storage.get_api_key(DEFAULT_PROVIDER).await {
        Ok(record) => Ok(record.map(|record| record.api_key)),
        Err(err) => {
            error!(event = "storage_error", error = %err, "credential lookup failed");
            Err(ErrorEnvelope::local(ClassifiedError::unexpected(
                "credential lookup failed",
            )))
        }
    }
}

fn no_api_key_response() -> Response {
    Json(ErrorEnvelope::local(ClassifiedError::no_api_key())).into_response()
}

fn status_to_wire(record: entities::status_checks::Model) -> StatusCheck {
    StatusCheck {
        id: record.id,
        client_name: record.client_name,
        timestamp: record.timestamp,
    }
}

fn api_key_to_wire(record: entities::api_keys::Model) -> ApiKeyRecord {
    ApiKeyRecord {
        id: record.id,
        api_key: record.api_key,
        provider: record.provider,
        created_at: record.created_at,
    }
}
