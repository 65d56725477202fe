use std::{
    future::Future,
    io::{IsTerminal, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{Level, ResizeController, SelectedFile, SessionState};
use shared::domain::SizeTag;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod config;
mod input;
mod platform;
mod theme;
mod view;

use config::{load_settings, Settings};
use input::{parse_command, SessionCommand, HELP};
use theme::Theme;
use view::TerminalView;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Parser, Debug)]
#[command(
    name = "thumbnailer",
    about = "Upload an image to the resize service and get a thumbnail URL"
)]
struct Cli {
    /// Resize service endpoint; overrides config files and APP__ENDPOINT
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Target size: small, medium or large
    #[arg(long, global = true)]
    size: Option<SizeTag>,
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize one image and print the thumbnail URL
    Resize {
        file: PathBuf,
        /// Copy the thumbnail URL to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Interactive session: select images, switch sizes, resize repeatedly
    Session,
    /// Print the effective configuration
    Config,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = load_settings()?.with_overrides(cli.endpoint, cli.size);
    let color =
        !cli.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
    let theme = Theme::new(settings.accent, settings.mode, color);

    match cli.command {
        Command::Config => {
            let rendered = toml::to_string_pretty(&settings).context("serialize settings")?;
            print!("{rendered}");
            Ok(())
        }
        Command::Resize { file, copy } => run_once(&settings, theme, file, copy).await,
        Command::Session => run_session(&settings, theme).await,
    }
}

fn build(settings: &Settings, theme: Theme) -> Result<(ResizeController, TerminalView)> {
    let endpoint = settings.endpoint_url()?;
    info!(%endpoint, "using resize service");
    let controller = ResizeController::http(endpoint);
    let view = TerminalView::new(
        theme,
        Duration::from_secs(settings.toast_ttl_secs),
        settings.default_size,
    );
    Ok((controller, view))
}

async fn run_once(settings: &Settings, theme: Theme, file: PathBuf, copy: bool) -> Result<()> {
    let (controller, mut view) = build(settings, theme)?;
    let mut rx = controller.subscribe_events();
    let mut state = SessionState::new(settings.default_size);

    controller
        .select_file(&mut state, Some(SelectedFile::new(file)))
        .await;
    let outcome = with_spinner(controller.execute_resize(&mut state)).await;
    view.drain(&mut rx);

    match outcome {
        Ok(result) => {
            if copy {
                copy_url(&mut view, &result.url);
            }
            println!("{}", view.render());
            Ok(())
        }
        Err(err) => {
            println!("{}", view.render());
            Err(anyhow::Error::new(err).context("resize failed"))
        }
    }
}

async fn run_session(settings: &Settings, theme: Theme) -> Result<()> {
    let (controller, mut view) = build(settings, theme)?;
    let mut rx = controller.subscribe_events();
    let mut state = SessionState::new(settings.default_size);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    println!("{}", view.render());
    prompt()?;

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                view.push_toast(Level::Error, err.to_string());
                SessionCommand::Nothing
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Nothing => {}
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Open(path) => {
                controller
                    .select_file(&mut state, Some(SelectedFile::new(path)))
                    .await;
            }
            SessionCommand::Pick => {
                let picked = tokio::task::spawn_blocking(platform::pick_image)
                    .await
                    .context("file dialog task failed")?;
                apply_pick(&controller, &mut state, picked).await;
            }
            SessionCommand::Clear => {
                controller.select_file(&mut state, None).await;
            }
            SessionCommand::Size(size) => controller.select_size(&mut state, size),
            SessionCommand::Resize => {
                // failures are already on the surface via events
                let _ = with_spinner(controller.execute_resize(&mut state)).await;
            }
            SessionCommand::Copy => match state.last_url() {
                Some(url) => copy_url(&mut view, url),
                None => view.push_toast(Level::Error, "No thumbnail URL to copy yet."),
            },
            SessionCommand::History => {
                view.drain(&mut rx);
                println!("{}", view.render_history());
                prompt()?;
                continue;
            }
            SessionCommand::Stats => {
                view.drain(&mut rx);
                println!("{}", view.render_stats());
                prompt()?;
                continue;
            }
            SessionCommand::Theme(accent) => {
                let current = view.theme();
                view.set_theme(Theme::new(accent, current.mode, current.color));
            }
            SessionCommand::Mode(mode) => {
                let current = view.theme();
                view.set_theme(Theme::new(current.accent, mode, current.color));
            }
        }

        view.drain(&mut rx);
        println!("\n{}", view.render());
        prompt()?;
    }

    Ok(())
}

/// An empty pick clears the selection, like an emptied file input.
async fn apply_pick(
    controller: &ResizeController,
    state: &mut SessionState,
    picked: Option<PathBuf>,
) {
    controller
        .select_file(state, picked.map(SelectedFile::new))
        .await;
}

fn copy_url(view: &mut TerminalView, url: &str) {
    match platform::copy_to_clipboard(url) {
        Ok(()) => view.push_toast(Level::Success, "URL copied to clipboard."),
        Err(err) => {
            warn!(error = %err, "clipboard copy failed");
            view.push_toast(Level::Error, "Unable to copy URL.");
        }
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("failed to flush stdout")
}

/// Animates a spinner on stderr while `task` is pending.
async fn with_spinner<F: Future>(task: F) -> F::Output {
    if !std::io::stderr().is_terminal() {
        return task.await;
    }

    tokio::pin!(task);
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut frame = 0usize;
    loop {
        tokio::select! {
            output = &mut task => {
                eprint!("\r\x1b[2K");
                return output;
            }
            _ = ticker.tick() => {
                eprint!("\r{} Processing...", SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]);
                frame += 1;
            }
        }
    }
}
