use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when the service fails without telling us why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown size '{input}', expected one of: small, medium, large")]
pub struct ParseSizeTagError {
    pub input: String,
}

/// Failure body returned by the resize service, `{"error": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// The service-provided message, or the generic fallback when it is absent or blank.
    pub fn message(&self) -> &str {
        self.error
            .as_deref()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
    }
}
