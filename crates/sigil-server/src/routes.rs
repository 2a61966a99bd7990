use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Map, Value, json};
use sigil_engine::{EngineError, TokenCreateRequest, TokenValidateRequest, ValidationOutcome};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/token/issue/{role_name}", post(issue_token))
        .route("/v1/token/validate/{role_name}", post(validate_token_for_role))
        .route("/v1/token/validate", post(validate_token))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "service": "sigil-server" }))
}

async fn issue_token(
    State(state): State<Arc<AppState>>,
    Path(role_name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let mut fields = body_fields(&body)?;
    fields.insert("role_name".to_string(), Value::String(role_name));
    let request = TokenCreateRequest::decode(Value::Object(fields))?;

    let issued = state.engine.issue(&request).await?;
    Ok(Json(json!({
        "token": issued.token,
        "expires_at": issued.expires_at().map(|t| t.to_rfc3339()),
        "ttl": issued.ttl,
    })))
}

async fn validate_token_for_role(
    State(state): State<Arc<AppState>>,
    Path(role_name): Path<String>,
    body: Bytes,
) -> Result<Json<ValidationOutcome>, ApiError> {
    let mut fields = body_fields(&body)?;
    fields.insert("role_name".to_string(), Value::String(role_name));
    validate(&state, fields).await
}

async fn validate_token(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ValidationOutcome>, ApiError> {
    let fields = body_fields(&body)?;
    validate(&state, fields).await
}

async fn validate(
    state: &AppState,
    fields: Map<String, Value>,
) -> Result<Json<ValidationOutcome>, ApiError> {
    let request = TokenValidateRequest::decode(Value::Object(fields))?;
    Ok(Json(state.engine.validate(&request).await?))
}

/// Request bodies are JSON objects; an empty body is an empty object.
fn body_fields(body: &[u8]) -> Result<Map<String, Value>, EngineError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(EngineError::Decode("request body must be a JSON object".into())),
        Err(e) => Err(EngineError::Decode(e.to_string())),
    }
}
