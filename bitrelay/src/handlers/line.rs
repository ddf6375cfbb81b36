use crate::app::AppState;
use crate::errors::{ApiResult, AppError};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PostMessageResponse {
    pub status: String,
}

pub async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<PostMessageRequest>,
) -> ApiResult<PostMessageResponse> {
    if request.message.is_empty() {
        return Err(AppError::BadRequest("message is empty".to_string()));
    }

    state.notifier.post_message(&request.message).await?;

    Ok(Json(PostMessageResponse {
        status: "Message sent successfully".to_string(),
    }))
}
