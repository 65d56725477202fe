//! Interactive session commands, including paths dropped onto the terminal.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use shared::domain::SizeTag;
use url::Url;

use crate::theme::{Accent, Mode};

pub const HELP: &str = "\
commands:
  open <path>      select an image (or just drop the file onto the terminal)
  pick             choose an image with the system file dialog
  clear            forget the selected image
  size <tag>       small | medium | large
  resize | go      upload and resize the selected image
  copy             copy the latest thumbnail URL to the clipboard
  history          list thumbnails generated this session
  stats            show counters
  theme <accent>   blue | green | purple | orange
  mode <mode>      dark | light
  help             show this text
  quit             leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Open(PathBuf),
    Pick,
    Clear,
    Size(SizeTag),
    Resize,
    Copy,
    History,
    Stats,
    Theme(Accent),
    Mode(Mode),
    Help,
    Quit,
    Nothing,
}

pub fn parse_command(line: &str) -> anyhow::Result<SessionCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(SessionCommand::Nothing);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "open" => SessionCommand::Open(normalize_dropped_path(required(rest, "open <path>")?)?),
        "pick" => SessionCommand::Pick,
        "clear" => SessionCommand::Clear,
        "size" => SessionCommand::Size(required(rest, "size <tag>")?.parse()?),
        "resize" | "go" => SessionCommand::Resize,
        "copy" => SessionCommand::Copy,
        "history" => SessionCommand::History,
        "stats" => SessionCommand::Stats,
        "theme" => SessionCommand::Theme(required(rest, "theme <accent>")?.parse()?),
        "mode" => SessionCommand::Mode(required(rest, "mode <mode>")?.parse()?),
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        _ if looks_like_dropped_path(line) => SessionCommand::Open(normalize_dropped_path(line)?),
        other => bail!("unknown command '{other}', type `help` for a list"),
    };
    Ok(command)
}

fn required<'a>(rest: &'a str, usage: &str) -> anyhow::Result<&'a str> {
    if rest.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(rest)
}

fn looks_like_dropped_path(line: &str) -> bool {
    line.starts_with(['/', '~', '\'', '"', '.'])
        || line.starts_with("file://")
        || line.contains(std::path::MAIN_SEPARATOR)
}

/// Turns what a terminal pastes for a dropped file into a path.
///
/// Handles `file://` URLs, surrounding quotes, backslash-escaped characters and `~/`.
pub fn normalize_dropped_path(raw: &str) -> anyhow::Result<PathBuf> {
    let raw = raw.trim();

    if raw.starts_with("file://") {
        let url = Url::parse(raw).with_context(|| format!("invalid file URL '{raw}'"))?;
        return url
            .to_file_path()
            .map_err(|()| anyhow!("file URL '{raw}' does not name a local path"));
    }

    let unquoted = strip_matching_quotes(raw);
    let path = if unquoted.len() != raw.len() {
        unquoted.to_string()
    } else {
        unescape_backslashes(raw)
    };

    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("cannot expand '~': no home directory")?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(path))
}

fn strip_matching_quotes(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

fn unescape_backslashes(raw: &str) -> String {
    if cfg!(windows) {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_commands() {
        assert_eq!(parse_command("  ").expect("empty"), SessionCommand::Nothing);
        assert_eq!(parse_command("go").expect("go"), SessionCommand::Resize);
        assert_eq!(parse_command("RESIZE").expect("resize"), SessionCommand::Resize);
        assert_eq!(
            parse_command("size medium").expect("size"),
            SessionCommand::Size(SizeTag::Medium)
        );
        assert_eq!(
            parse_command("theme green").expect("theme"),
            SessionCommand::Theme(Accent::Green)
        );
        assert_eq!(
            parse_command("mode light").expect("mode"),
            SessionCommand::Mode(Mode::Light)
        );
        assert_eq!(parse_command("q").expect("quit"), SessionCommand::Quit);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_command("size huge").is_err());
        assert!(parse_command("size").is_err());
        assert!(parse_command("open").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn open_keeps_spaces_in_path() {
        assert_eq!(
            parse_command("open /tmp/my photos/cat.png").expect("open"),
            SessionCommand::Open(PathBuf::from("/tmp/my photos/cat.png"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn dropped_paths_are_normalized() {
        assert_eq!(
            parse_command("'/tmp/my photos/cat.png' ").expect("quoted"),
            SessionCommand::Open(PathBuf::from("/tmp/my photos/cat.png"))
        );
        assert_eq!(
            parse_command(r"/tmp/my\ photos/cat\ 1.png").expect("escaped"),
            SessionCommand::Open(PathBuf::from("/tmp/my photos/cat 1.png"))
        );
        assert_eq!(
            parse_command("file:///tmp/my%20photos/cat.png").expect("url"),
            SessionCommand::Open(PathBuf::from("/tmp/my photos/cat.png"))
        );
    }

    #[test]
    fn help_lists_every_command() {
        for word in ["open", "pick", "clear", "size", "resize", "copy", "history", "stats", "theme", "mode", "quit"] {
            assert!(HELP.contains(word), "help is missing {word}");
        }
    }
}
