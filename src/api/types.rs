//! API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::non_blank;

/// Body of `POST /secret/encrypt`.
///
/// Fields are kept as raw JSON values so that a non-string `url` or
/// `password` is reported as missing rather than as a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncryptRequest {
    #[serde(default)]
    pub url: Option<Value>,

    #[serde(default)]
    pub password: Option<Value>,
}

impl EncryptRequest {
    /// Trimmed, non-blank URL if one was provided as a string.
    pub fn url(&self) -> Option<String> {
        non_blank(self.url.as_ref().and_then(Value::as_str))
    }

    /// Trimmed, non-blank password if one was provided as a string.
    pub fn password(&self) -> Option<String> {
        non_blank(self.password.as_ref().and_then(Value::as_str))
    }
}

/// Successful encryption: link to the decrypt page carrying the secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    pub url: String,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// `url` and `password` as sent by the encrypt page, either as query
/// parameters or as a posted form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncryptParams {
    pub url: Option<String>,
    pub password: Option<String>,
}

/// Query string accepted by `GET /secret/decrypt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecryptQuery {
    pub secret: Option<String>,
}

/// Form fields posted by the decrypt page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecryptForm {
    pub secret: Option<String>,
    pub password: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dev_mode: bool,
}
