//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                            | Return Type         |
// |-----------------------|----------------------------------------|---------------------|
// | health                | Health check endpoint                  | impl IntoResponse   |
// | generate_story        | Generate a story from the request body | ApiResult<Response> |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, rejection::BytesRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::info;

use super::{ApiResult, AppState, StoryRequest, StoryResponse};

/// Methods advertised on successful story responses.
const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Headers advertised on successful story responses.
const ALLOWED_HEADERS: &str = "Content-Type";

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// Generate a story from an optional `{topic, style, length}` body
pub async fn generate_story(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Response> {
    let body = body?;
    let input = StoryRequest::from_body(&body)?.into_input()?;

    info!(
        topic = %input.topic,
        style = input.style.as_deref().unwrap_or_default(),
        length = %input.length,
        "generating story"
    );

    let story = state.generator.generate(&input).await?;

    info!("story generated successfully");

    Ok((
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        ],
        Json(StoryResponse::ok(story)),
    )
        .into_response())
}
