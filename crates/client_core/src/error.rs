use std::path::PathBuf;

use thiserror::Error;

/// Why a resize attempt failed. Every variant ends the attempt; none are retried.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("Please choose or drop an image file first.")]
    NoFileSelected,
    #[error("Unable to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Request could not be completed.")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Service { status: u16, message: String },
    #[error("Invalid JSON returned from API.")]
    MalformedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("Response did not include a thumbnail URL.")]
    MissingUrl { status: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LocalValidation,
    FileRead,
    Transport,
    Service,
    MalformedResponse,
}

impl ResizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResizeError::NoFileSelected => ErrorKind::LocalValidation,
            ResizeError::FileRead { .. } => ErrorKind::FileRead,
            ResizeError::Transport(_) => ErrorKind::Transport,
            ResizeError::Service { .. } => ErrorKind::Service,
            ResizeError::MalformedResponse { .. } | ResizeError::MissingUrl { .. } => {
                ErrorKind::MalformedResponse
            }
        }
    }

    /// Text for the status banner and the error toast.
    pub fn display_message(&self) -> String {
        match self {
            ResizeError::NoFileSelected => self.to_string(),
            _ => format!("Error: {self}"),
        }
    }
}
