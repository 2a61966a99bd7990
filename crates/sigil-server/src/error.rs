use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sigil_engine::EngineError;

/// An [`EngineError`] rendered as `{ "error": <message> }`.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EngineError::RoleNotFound { .. } | EngineError::KeyNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            EngineError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            EngineError::Decode(_)
            | EngineError::UnsupportedTokenType(_)
            | EngineError::TokenParseFailure(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
