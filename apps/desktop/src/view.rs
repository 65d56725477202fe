//! Terminal display surface: folds controller events into a renderable frame.

use std::time::{Duration, Instant};

use client_core::{
    events::{NO_FILE_LABEL, NO_RESULT_TEXT},
    Counters, HistoryEntry, Level, PreviewView, ResultView, TriggerState, UiEvent,
};
use shared::domain::SizeTag;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::theme::{Role, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResultPane {
    Empty,
    Preview(PreviewView),
    PreviewFailed(String),
    Result(ResultView),
}

#[derive(Debug, Clone)]
struct Toast {
    level: Level,
    text: String,
    expires_at: Instant,
}

pub struct TerminalView {
    theme: Theme,
    toast_ttl: Duration,
    file_label: String,
    size: SizeTag,
    status: Option<(Level, String)>,
    toasts: Vec<Toast>,
    trigger: TriggerState,
    progress: bool,
    counters: Counters,
    pane: ResultPane,
    history: Vec<HistoryEntry>,
}

impl TerminalView {
    pub fn new(theme: Theme, toast_ttl: Duration, size: SizeTag) -> Self {
        Self {
            theme,
            toast_ttl,
            file_label: NO_FILE_LABEL.to_string(),
            size,
            status: None,
            toasts: Vec::new(),
            trigger: TriggerState::Ready,
            progress: false,
            counters: Counters::default(),
            pane: ResultPane::Empty,
            history: Vec::new(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Applies every event queued on `rx` without waiting.
    pub fn drain(&mut self, rx: &mut broadcast::Receiver<UiEvent>) {
        let now = Instant::now();
        loop {
            match rx.try_recv() {
                Ok(event) => self.apply_at(event, now),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "display surface fell behind controller events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    pub fn apply_at(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::FileNameChanged(name) => {
                self.file_label = name.unwrap_or_else(|| NO_FILE_LABEL.to_string());
            }
            UiEvent::PreviewCleared => self.pane = ResultPane::Empty,
            UiEvent::PreviewRendered(preview) => self.pane = ResultPane::Preview(preview),
            UiEvent::PreviewFailed { reason } => self.pane = ResultPane::PreviewFailed(reason),
            UiEvent::SizeSelected(size) => self.size = size,
            UiEvent::Status { level, text } => self.status = Some((level, text)),
            UiEvent::Toast { level, text } => self.push_toast_at(level, text, now),
            UiEvent::Trigger(state) => self.trigger = state,
            UiEvent::Progress { active } => self.progress = active,
            UiEvent::CountersUpdated(counters) => self.counters = counters,
            UiEvent::ResultRendered(view) => self.pane = ResultPane::Result(view),
            UiEvent::HistoryAppended(entry) => self.history.push(entry),
        }
    }

    /// Toasts raised by the surface itself (clipboard, bad input).
    pub fn push_toast(&mut self, level: Level, text: impl Into<String>) {
        self.push_toast_at(level, text.into(), Instant::now());
    }

    fn push_toast_at(&mut self, level: Level, text: String, now: Instant) {
        self.toasts.push(Toast {
            level,
            text,
            expires_at: now + self.toast_ttl,
        });
    }

    pub fn render(&mut self) -> String {
        self.render_at(Instant::now())
    }

    /// Drops expired toasts, then renders the whole surface.
    pub fn render_at(&mut self, now: Instant) -> String {
        self.toasts.retain(|toast| toast.expires_at > now);

        let mut lines = Vec::new();
        lines.push(format!(
            "{} {}",
            self.theme.paint(Role::Muted, "File:"),
            self.file_label
        ));
        lines.push(format!(
            "{} {}",
            self.theme.paint(Role::Muted, "Size:"),
            self.size_chips()
        ));

        if let Some((level, text)) = &self.status {
            lines.push(format!(
                "{} {}",
                self.theme.paint(Role::Muted, "Status:"),
                self.theme.paint(Role::Level(*level), text)
            ));
        }

        lines.extend(self.render_pane());
        lines.push(self.render_stats());

        let trigger = format!("[ {} ]", self.trigger.label());
        let trigger = if self.trigger.is_enabled() {
            self.theme.paint(Role::AccentStrong, &trigger)
        } else {
            self.theme.paint(Role::Muted, &trigger)
        };
        if self.progress {
            lines.push(format!("{trigger} {}", self.theme.paint(Role::Accent, "▰▰▰▱▱")));
        } else {
            lines.push(trigger);
        }

        for toast in &self.toasts {
            lines.push(format!(
                "  {} {}",
                self.theme.paint(Role::Level(toast.level), level_marker(toast.level)),
                toast.text
            ));
        }

        if !self.history.is_empty() {
            lines.push(self.render_history_strip());
        }

        lines.join("\n")
    }

    fn size_chips(&self) -> String {
        SizeTag::ALL
            .iter()
            .map(|tag| {
                if *tag == self.size {
                    self.theme.paint(Role::Accent, &format!("[{tag}]"))
                } else {
                    self.theme.paint(Role::Muted, &format!(" {tag} "))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_pane(&self) -> Vec<String> {
        match &self.pane {
            ResultPane::Empty => vec![self.theme.paint(Role::Muted, NO_RESULT_TEXT)],
            ResultPane::PreviewFailed(reason) => {
                vec![self.theme.paint(Role::Level(Level::Error), reason)]
            }
            ResultPane::Preview(preview) => vec![
                format!("Original image (preview): {}", preview.filename),
                format!("  {}", preview.dimensions),
                self.theme.paint(
                    Role::Muted,
                    "Thumbnail: run `resize` to generate a thumbnail.",
                ),
                self.theme.paint(
                    Role::Muted,
                    "Presigned URL will appear here after resizing.",
                ),
            ],
            ResultPane::Result(view) => vec![
                format!("Original image: {}", view.original_name),
                format!("  {}", view.original),
                {
                    let (width, height) = view.size.bounding_box();
                    format!("Thumbnail ({}, fits {width} × {height}):", view.size)
                },
                format!("  {}", view.thumbnail),
                format!(
                    "Presigned URL: {}",
                    self.theme.paint(Role::Accent, &view.url)
                ),
            ],
        }
    }

    pub fn render_stats(&self) -> String {
        format!(
            "Images processed: {} · Last size: {} · Last status: {}",
            self.counters.images_processed,
            self.counters.last_size_label(),
            self.counters.last_status
        )
    }

    fn render_history_strip(&self) -> String {
        let cards = self
            .history
            .iter()
            .map(|entry| {
                format!(
                    "[{} {}]",
                    entry.size,
                    entry.completed_at.format("%H:%M:%S")
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {cards}", self.theme.paint(Role::Muted, "History:"))
    }

    /// Numbered history list with full URLs, newest last.
    pub fn render_history(&self) -> String {
        if self.history.is_empty() {
            return self.theme.paint(Role::Muted, "No thumbnails yet.");
        }
        self.history
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                format!(
                    "{:>3}. {:<6} {}  {}",
                    idx + 1,
                    entry.size,
                    entry.completed_at.format("%H:%M:%S"),
                    entry.url
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn level_marker(level: Level) -> &'static str {
    match level {
        Level::Info => "ℹ",
        Level::Success => "✔",
        Level::Error => "✖",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use client_core::{Dimensions, LastStatus};

    fn view() -> TerminalView {
        TerminalView::new(Theme::plain(), Duration::from_secs(4), SizeTag::Small)
    }

    fn entry(size: SizeTag) -> HistoryEntry {
        HistoryEntry {
            url: format!("https://x/{size}.jpg"),
            size,
            completed_at: Local
                .with_ymd_and_hms(2026, 10, 18, 14, 3, 22)
                .single()
                .expect("valid time"),
        }
    }

    #[test]
    fn initial_frame_shows_placeholders() {
        let frame = view().render();
        assert!(frame.contains("File: No file selected yet"));
        assert!(frame.contains("[small]"));
        assert!(frame.contains("No thumbnail generated yet."));
        assert!(frame.contains("Images processed: 0 · Last size: - · Last status: -"));
        assert!(frame.contains("[ Upload & Resize ]"));
        assert!(!frame.contains("History:"));
    }

    #[test]
    fn busy_cycle_disables_trigger_until_ready() {
        let mut view = view();
        let now = Instant::now();
        view.apply_at(UiEvent::Trigger(TriggerState::Busy), now);
        view.apply_at(UiEvent::Progress { active: true }, now);
        let frame = view.render_at(now);
        assert!(frame.contains("[ Processing... ] ▰▰▰▱▱"));
        assert!(!frame.contains("Upload & Resize"));

        view.apply_at(UiEvent::Trigger(TriggerState::Ready), now);
        view.apply_at(UiEvent::Progress { active: false }, now);
        let frame = view.render_at(now);
        assert!(frame.contains("[ Upload & Resize ]"));
        assert!(!frame.contains("▰"));
    }

    #[test]
    fn result_pane_shows_comparison_and_url() {
        let mut view = view();
        let now = Instant::now();
        view.apply_at(
            UiEvent::ResultRendered(ResultView {
                original_name: "cat.png".into(),
                original: Dimensions::Known {
                    width: 640,
                    height: 480,
                },
                size: SizeTag::Medium,
                thumbnail: Dimensions::Unknown,
                url: "https://x/y.jpg".into(),
            }),
            now,
        );
        let frame = view.render_at(now);
        assert!(frame.contains("Original image: cat.png"));
        assert!(frame.contains("640 × 480 px"));
        assert!(frame.contains("Thumbnail (medium, fits 300 × 300):"));
        assert!(frame.contains("- × - px"));
        assert!(frame.contains("Presigned URL: https://x/y.jpg"));
    }

    #[test]
    fn toasts_expire_after_ttl() {
        let mut view = view();
        let start = Instant::now();
        view.apply_at(
            UiEvent::Toast {
                level: Level::Success,
                text: "Thumbnail generated successfully.".into(),
            },
            start,
        );
        assert!(view
            .render_at(start + Duration::from_secs(1))
            .contains("✔ Thumbnail generated successfully."));
        assert!(!view
            .render_at(start + Duration::from_secs(5))
            .contains("Thumbnail generated successfully."));
    }

    #[test]
    fn counters_and_history_follow_events() {
        let mut view = view();
        let now = Instant::now();
        view.apply_at(
            UiEvent::CountersUpdated(Counters {
                images_processed: 2,
                last_size: Some(SizeTag::Large),
                last_status: LastStatus::Success,
            }),
            now,
        );
        view.apply_at(UiEvent::HistoryAppended(entry(SizeTag::Small)), now);
        view.apply_at(UiEvent::HistoryAppended(entry(SizeTag::Large)), now);

        let frame = view.render_at(now);
        assert!(frame.contains("Images processed: 2 · Last size: large · Last status: success"));
        assert!(frame.contains("History: [small 14:03:22] [large 14:03:22]"));

        let history = view.render_history();
        assert!(history.contains("  1. small  14:03:22  https://x/small.jpg"));
        assert!(history.contains("  2. large  14:03:22  https://x/large.jpg"));
    }

    #[test]
    fn drain_applies_queued_events_in_order() {
        let (tx, mut rx) = broadcast::channel(8);
        tx.send(UiEvent::FileNameChanged(Some("a.png".into())))
            .expect("send");
        tx.send(UiEvent::SizeSelected(SizeTag::Large)).expect("send");
        tx.send(UiEvent::PreviewFailed {
            reason: "Unable to preview image.".into(),
        })
        .expect("send");

        let mut view = view();
        view.drain(&mut rx);
        let frame = view.render();
        assert!(frame.contains("File: a.png"));
        assert!(frame.contains("[large]"));
        assert!(frame.contains("Unable to preview image."));
    }
}
