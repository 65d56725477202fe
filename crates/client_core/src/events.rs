//! Outcome events published by the controller for the display surface.

use shared::domain::SizeTag;

use crate::{
    probe::Dimensions,
    session::{Counters, HistoryEntry},
};

pub const NO_FILE_LABEL: &str = "No file selected yet";
pub const NO_RESULT_TEXT: &str = "No thumbnail generated yet.";
pub const PREVIEW_FAILED_TEXT: &str = "Unable to preview image.";
pub const PENDING_STATUS_TEXT: &str = "Uploading and resizing...";
pub const PENDING_TOAST_TEXT: &str = "Uploading and resizing image...";
pub const SUCCESS_TEXT: &str = "Thumbnail generated successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Ready,
    Busy,
}

impl TriggerState {
    pub fn label(self) -> &'static str {
        match self {
            TriggerState::Ready => "Upload & Resize",
            TriggerState::Busy => "Processing...",
        }
    }

    pub fn is_enabled(self) -> bool {
        self == TriggerState::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub filename: String,
    pub dimensions: Dimensions,
}

/// Before/after comparison for a finished resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub original_name: String,
    pub original: Dimensions,
    pub size: SizeTag,
    pub thumbnail: Dimensions,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// `None` means nothing is selected.
    FileNameChanged(Option<String>),
    PreviewCleared,
    PreviewRendered(PreviewView),
    PreviewFailed {
        reason: String,
    },
    SizeSelected(SizeTag),
    Status {
        level: Level,
        text: String,
    },
    Toast {
        level: Level,
        text: String,
    },
    Trigger(TriggerState),
    Progress {
        active: bool,
    },
    CountersUpdated(Counters),
    ResultRendered(ResultView),
    HistoryAppended(HistoryEntry),
}
