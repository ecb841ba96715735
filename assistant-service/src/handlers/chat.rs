use crate::dtos::{ChatErrorResponse, ChatParams, ChatResponse};
use crate::pipelines::PipelineError;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// `/chat` failures: `{"error": "..."}`, 400 for bad input, 500 otherwise.
pub struct ChatError(PipelineError);

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ChatErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn chat(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
) -> Result<Json<ChatResponse>, ChatError> {
    let input = params.input.unwrap_or_default();

    let reply = state.chat.run(&input).await.map_err(ChatError)?;

    Ok(Json(ChatResponse {
        reply: reply.into_inner(),
    }))
}
