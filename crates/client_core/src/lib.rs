use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

use reqwest::Client;
use shared::{domain::SizeTag, protocol::ResizeRequest};
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use url::Url;

pub mod encoding;
pub mod error;
pub mod events;
pub mod probe;
pub mod service;
pub mod session;

pub use error::{ErrorKind, ResizeError};
pub use events::{Level, PreviewView, ResultView, TriggerState, UiEvent};
pub use probe::{Dimensions, HttpThumbnailProbe, ThumbnailProbe};
pub use service::{HttpResizeService, ResizeService};
pub use session::{Counters, HistoryEntry, LastStatus, Phase, SelectedFile, SessionState};

const EVENT_CAPACITY: usize = 1024;

/// Drives one upload-and-resize interaction at a time against a [`SessionState`].
///
/// The controller never owns the session; every operation borrows it. Rendering
/// happens elsewhere, from the [`UiEvent`]s published on the event channel.
pub struct ResizeController {
    service: Arc<dyn ResizeService>,
    probe: Arc<dyn ThumbnailProbe>,
    events: broadcast::Sender<UiEvent>,
}

impl ResizeController {
    pub fn new(service: Arc<dyn ResizeService>, probe: Arc<dyn ThumbnailProbe>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            service,
            probe,
            events,
        }
    }

    /// Controller talking HTTP to `endpoint`, sharing one connection pool for
    /// the resize call and the thumbnail download.
    pub fn http(endpoint: Url) -> Self {
        let http = Client::new();
        Self::new(
            Arc::new(HttpResizeService::new(http.clone(), endpoint)),
            Arc::new(HttpThumbnailProbe::new(http)),
        )
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: UiEvent) {
        // no subscribers is fine: nothing is being rendered
        let _ = self.events.send(event);
    }

    fn notify(&self, level: Level, text: impl Into<String>) {
        let text = text.into();
        self.emit(UiEvent::Status {
            level,
            text: text.clone(),
        });
        self.emit(UiEvent::Toast { level, text });
    }

    /// Replaces the current file and renders its preview. `None` clears the selection.
    ///
    /// A preview that cannot be produced is reported but leaves the file selected.
    pub async fn select_file(
        &self,
        state: &mut SessionState,
        file: Option<SelectedFile>,
    ) -> Option<PreviewView> {
        let Some(file) = file else {
            state.file = None;
            self.emit(UiEvent::FileNameChanged(None));
            self.emit(UiEvent::PreviewCleared);
            return None;
        };

        info!(path = %file.path().display(), "file selected");
        self.emit(UiEvent::FileNameChanged(Some(file.name().to_string())));
        state.file = Some(file.clone());

        let dimensions = match tokio::fs::read(file.path()).await {
            Ok(bytes) => probe::probe_bytes(&bytes),
            Err(err) => {
                warn!(path = %file.path().display(), error = %err, "preview read failed");
                Dimensions::Unknown
            }
        };

        if !dimensions.is_known() {
            self.emit(UiEvent::PreviewFailed {
                reason: events::PREVIEW_FAILED_TEXT.to_string(),
            });
            return None;
        }

        let preview = PreviewView {
            filename: file.name().to_string(),
            dimensions,
        };
        self.emit(UiEvent::PreviewRendered(preview.clone()));
        Some(preview)
    }

    pub fn select_size(&self, state: &mut SessionState, size: SizeTag) {
        state.size = size;
        self.emit(UiEvent::SizeSelected(size));
    }

    /// Runs one full resize cycle: Idle → Pending → {Success, Error} → Idle.
    ///
    /// Failures are reported to the display surface and counted before being
    /// returned; the caller does not need to render them again.
    pub async fn execute_resize(
        &self,
        state: &mut SessionState,
    ) -> Result<ResultView, ResizeError> {
        let size = state.size;
        let Some(file) = state.file.clone() else {
            let err = ResizeError::NoFileSelected;
            self.report_failure(state, size, &err);
            return Err(err);
        };

        let mut cycle = PendingCycle::begin(state, self.events.clone());
        self.emit(UiEvent::Status {
            level: Level::Info,
            text: events::PENDING_STATUS_TEXT.to_string(),
        });
        self.emit(UiEvent::Toast {
            level: Level::Info,
            text: events::PENDING_TOAST_TEXT.to_string(),
        });

        match self.run_cycle(&file, size).await {
            Ok(view) => {
                self.report_success(&mut cycle, &view);
                Ok(view)
            }
            Err(err) => {
                self.report_failure(&mut cycle, size, &err);
                Err(err)
            }
        }
    }

    async fn run_cycle(&self, file: &SelectedFile, size: SizeTag) -> Result<ResultView, ResizeError> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|source| ResizeError::FileRead {
                path: file.path().to_path_buf(),
                source,
            })?;
        let original = probe::probe_bytes(&bytes);

        let request = ResizeRequest {
            filename: file.name().to_string(),
            size,
            file: encoding::encode_file(&bytes),
        };
        info!(filename = %request.filename, %size, bytes = bytes.len(), "requesting thumbnail");

        let url = self.service.resize(&request).await?;
        let thumbnail = self.probe.dimensions(&url).await;

        Ok(ResultView {
            original_name: request.filename,
            original,
            size,
            thumbnail,
            url,
        })
    }

    fn report_success(&self, state: &mut SessionState, view: &ResultView) {
        info!(size = %view.size, url = %view.url, "thumbnail generated");
        self.notify(Level::Success, events::SUCCESS_TEXT);

        state.counters.record(view.size, true);
        self.emit(UiEvent::CountersUpdated(state.counters));
        self.emit(UiEvent::ResultRendered(view.clone()));

        let entry = HistoryEntry {
            url: view.url.clone(),
            size: view.size,
            completed_at: chrono::Local::now(),
        };
        state.history.push(entry.clone());
        self.emit(UiEvent::HistoryAppended(entry));
    }

    fn report_failure(&self, state: &mut SessionState, size: SizeTag, err: &ResizeError) {
        match err.kind() {
            ErrorKind::LocalValidation => warn!(%size, "resize requested without a file"),
            kind => error!(?kind, %size, error = %err, "resize failed"),
        }
        self.notify(Level::Error, err.display_message());

        state.counters.record(size, false);
        self.emit(UiEvent::CountersUpdated(state.counters));
    }
}

/// Exclusive hold on the session while a request is in flight.
///
/// Dropping it returns the session to Idle, re-enables the trigger and stops the
/// progress indicator, on every exit path including cancellation of the future.
struct PendingCycle<'a> {
    state: &'a mut SessionState,
    events: broadcast::Sender<UiEvent>,
}

impl<'a> PendingCycle<'a> {
    fn begin(state: &'a mut SessionState, events: broadcast::Sender<UiEvent>) -> Self {
        state.phase = Phase::Pending;
        let _ = events.send(UiEvent::Trigger(TriggerState::Busy));
        let _ = events.send(UiEvent::Progress { active: true });
        Self { state, events }
    }
}

impl Deref for PendingCycle<'_> {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        self.state
    }
}

impl DerefMut for PendingCycle<'_> {
    fn deref_mut(&mut self) -> &mut SessionState {
        self.state
    }
}

impl Drop for PendingCycle<'_> {
    fn drop(&mut self) {
        self.state.phase = Phase::Idle;
        let _ = self.events.send(UiEvent::Trigger(TriggerState::Ready));
        let _ = self.events.send(UiEvent::Progress { active: false });
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
