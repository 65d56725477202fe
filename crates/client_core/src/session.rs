//! Session state owned by the caller and threaded through every controller operation.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use shared::domain::SizeTag;

/// Used when a path has no usable final component.
const FALLBACK_FILENAME: &str = "image.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
    name: String,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name sent to the service as `filename` and shown to the user.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastStatus {
    #[default]
    Uninitialized,
    Success,
    Error,
}

impl fmt::Display for LastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LastStatus::Uninitialized => "-",
            LastStatus::Success => "success",
            LastStatus::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub images_processed: u64,
    pub last_size: Option<SizeTag>,
    pub last_status: LastStatus,
}

impl Counters {
    pub(crate) fn record(&mut self, size: SizeTag, success: bool) {
        if success {
            self.images_processed += 1;
            self.last_status = LastStatus::Success;
        } else {
            self.last_status = LastStatus::Error;
        }
        self.last_size = Some(size);
    }

    pub fn last_size_label(&self) -> &'static str {
        self.last_size.map(SizeTag::as_str).unwrap_or("-")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub size: SizeTag,
    pub completed_at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(crate) file: Option<SelectedFile>,
    pub(crate) size: SizeTag,
    pub(crate) counters: Counters,
    pub(crate) phase: Phase,
    pub(crate) history: Vec<HistoryEntry>,
}

impl SessionState {
    pub fn new(size: SizeTag) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn size(&self) -> SizeTag {
        self.size
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn last_url(&self) -> Option<&str> {
        self.history.last().map(|entry| entry.url.as_str())
    }
}
