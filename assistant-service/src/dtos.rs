use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ChatParams {
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatErrorResponse {
    pub error: String,
}

/// Body of every `/extractPolicy` response, success or failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub message: String,
}
