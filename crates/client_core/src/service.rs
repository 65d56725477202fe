//! Client side of the remote resize service contract.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::protocol::{ResizeRequest, ResizeResponse};
use tracing::debug;
use url::Url;

use crate::error::ResizeError;

#[async_trait]
pub trait ResizeService: Send + Sync {
    /// Sends one request and returns the pre-signed thumbnail URL.
    async fn resize(&self, request: &ResizeRequest) -> Result<String, ResizeError>;
}

pub struct HttpResizeService {
    http: Client,
    endpoint: Url,
}

impl HttpResizeService {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ResizeService for HttpResizeService {
    async fn resize(&self, request: &ResizeRequest) -> Result<String, ResizeError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), body = %text, "raw resize response");
        interpret_response(status.as_u16(), status.is_success(), &text)
    }
}

/// Maps a status code and raw body onto the contract.
///
/// The body must be JSON whatever the status; only then is the status consulted.
pub(crate) fn interpret_response(
    status: u16,
    success: bool,
    text: &str,
) -> Result<String, ResizeError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|source| ResizeError::MalformedResponse { status, source })?;
    let body = ResizeResponse::from_json_value(&value);

    if !success {
        return Err(ResizeError::Service {
            status,
            message: body.error_body().message().to_string(),
        });
    }

    body.success_url()
        .map(str::to_string)
        .ok_or(ResizeError::MissingUrl { status })
}
