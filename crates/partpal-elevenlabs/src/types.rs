// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ElevenLabs text-to-speech request and error types.

use serde::{Deserialize, Serialize};

/// Body of `POST /text-to-speech/{voice_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct TextToSpeechRequest {
    pub text: String,
    pub model_id: String,
}

/// Error envelope. `detail` is an object for API errors and an array for
/// request validation failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Status {
        #[serde(default)]
        status: Option<String>,
        message: String,
    },
    Validation(Vec<ValidationIssue>),
    Plain(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub msg: String,
}

impl ErrorDetail {
    pub fn describe(&self) -> String {
        match self {
            ErrorDetail::Status {
                status: Some(status),
                message,
            } => format!("{status}: {message}"),
            ErrorDetail::Status { message, .. } => message.clone(),
            ErrorDetail::Validation(issues) => issues
                .iter()
                .map(|i| i.msg.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            ErrorDetail::Plain(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_request() {
        let req = TextToSpeechRequest {
            text: "Identified: LM7805".into(),
            model_id: "eleven_multilingual_v2".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"text": "Identified: LM7805", "model_id": "eleven_multilingual_v2"})
        );
    }

    #[test]
    fn describe_status_error() {
        let err: ApiErrorResponse = serde_json::from_str(
            r#"{"detail": {"status": "quota_exceeded", "message": "You have 0 credits left."}}"#,
        )
        .unwrap();
        assert_eq!(
            err.detail.describe(),
            "quota_exceeded: You have 0 credits left."
        );
    }

    #[test]
    fn describe_validation_error() {
        let err: ApiErrorResponse = serde_json::from_str(
            r#"{"detail": [{"loc": ["body", "text"], "msg": "field required", "type": "value_error.missing"}]}"#,
        )
        .unwrap();
        assert_eq!(err.detail.describe(), "field required");
    }

    #[test]
    fn describe_plain_error() {
        let err: ApiErrorResponse =
            serde_json::from_str(r#"{"detail": "Not Found"}"#).unwrap();
        assert_eq!(err.detail.describe(), "Not Found");
    }
}
