use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::SizeTag, error::ServiceErrorBody};

/// Body of `POST <endpoint>`. `file` is standard base64 without a data-URI prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRequest {
    pub filename: String,
    pub size: SizeTag,
    pub file: String,
}

/// Fields read from whatever JSON the service answers with.
/// Success carries `url`, failure carries `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResizeResponse {
    pub url: Option<String>,
    pub error: Option<String>,
}

impl ResizeResponse {
    /// Reads the known fields out of an already-validated JSON document.
    ///
    /// Each field is taken only when it is a string, so a mistyped neighbour
    /// never hides the other. Non-object documents yield an empty response.
    pub fn from_json_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            url: text("url"),
            error: text("error"),
        }
    }

    pub fn success_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn error_body(&self) -> ServiceErrorBody {
        ServiceErrorBody {
            error: self.error.clone(),
        }
    }
}
