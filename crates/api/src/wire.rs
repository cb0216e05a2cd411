//! Response envelopes and error payload parsing
//!
//! The marketplace API is not uniform: some endpoints answer with the bare
//! resource, others wrap it in `{ success, data, message }`. Error bodies use
//! `error`, `message`, or `msg` depending on the route.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::ApiError;

/// Longest plain-text error body shown to the user as-is
const MAX_PLAIN_ERROR_LEN: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped {
        success: bool,
        data: Option<T>,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(T),
}

/// Error body as sent by the API
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl ErrorBody {
    /// First non-empty message, in `error`, `message`, `msg` order
    pub fn into_message(self) -> Option<String> {
        let error = self.error.and_then(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        });

        [error, self.message, self.msg]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

/// Decode a 2xx body, unwrapping the `{success, data}` envelope when present.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| ApiError::Response(format!("Failed to parse response: {}", e)))?;

    match envelope {
        Envelope::Bare(value) => Ok(value),
        Envelope::Wrapped {
            success: true,
            data: Some(value),
            ..
        } => Ok(value),
        // `success` sat next to the resource fields rather than wrapping them
        Envelope::Wrapped {
            success: true,
            data: None,
            ..
        } => serde_json::from_str(body)
            .map_err(|e| ApiError::Response(format!("Failed to parse response: {}", e))),
        Envelope::Wrapped {
            success: false,
            message,
            ..
        } => Err(ApiError::Rejected(
            message.unwrap_or_else(|| "Request was not successful".to_string()),
        )),
    }
}

/// Build the error for a non-2xx response.
pub fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .or_else(|| {
            let trimmed = body.trim();
            let looks_like_markup = trimmed.starts_with('<');
            (!trimmed.is_empty() && !looks_like_markup && trimmed.len() <= MAX_PLAIN_ERROR_LEN)
                .then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    ApiError::Status { status, message }
}
