//! Clipboard and native file dialog.

use std::path::PathBuf;

use anyhow::Context;
use arboard::Clipboard;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("failed to write clipboard")
}

fn default_upload_dir() -> Option<PathBuf> {
    dirs::picture_dir()
        .or_else(dirs::desktop_dir)
        .or_else(dirs::download_dir)
        .or_else(dirs::home_dir)
}

/// Blocks until the user picks an image or cancels.
pub fn pick_image() -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().add_filter("Images", IMAGE_EXTENSIONS);
    if let Some(dir) = default_upload_dir() {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}
