use crate::dtos::PolicyResponse;
use crate::pipelines::{DocumentUpload, PipelineError, PolicyRequest};
use crate::startup::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

const FILE_FIELD: &str = "file";
const PROMPT_FIELD: &str = "prompt";

/// `/extractPolicy` failures: `{"message": "..."}`.
pub struct PolicyError {
    status: StatusCode,
    message: String,
}

impl From<PipelineError> for PolicyError {
    fn from(err: PipelineError) -> Self {
        let status = match err {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<MultipartError> for PolicyError {
    fn from(err: MultipartError) -> Self {
        let status = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        Self {
            status,
            message: format!("Failed to read multipart body: {}", err.body_text()),
        }
    }
}

impl From<MultipartRejection> for PolicyError {
    fn from(rejection: MultipartRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("Expected a multipart form: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for PolicyError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(PolicyResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

pub async fn extract_policy(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PolicyResponse>, PolicyError> {
    let mut multipart = multipart?;
    let mut request = PolicyRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();

                request.document = Some(DocumentUpload {
                    bytes,
                    file_name,
                    content_type,
                });
            }
            Some(PROMPT_FIELD) => {
                request.prompt = Some(field.text().await?);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unexpected multipart field");
            }
        }
    }

    let answer = state.documents.run(request).await?;

    Ok(Json(PolicyResponse {
        message: answer.into_inner(),
    }))
}
