mod actions;
mod app;
mod clipboard;
mod input;
mod ports;
mod view;

use anyhow::{Context, Result};
use app::App;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event as CEvent, KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use rolldraw_core::Locale;
use rolldraw_data::{default_assets_dir, find_preset, read_roster};
use std::fs::OpenOptions;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub locale: Option<String>,
    pub seed: Option<u64>,
    pub assets: Option<PathBuf>,
    pub roster_file: Option<PathBuf>,
    pub preset: Option<String>,
    pub count: Option<f64>,
    pub dedupe: Option<bool>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    init_file_logging()?;
    let locale = Locale::from_opt(options.locale.as_deref());
    let assets = options.assets.clone().unwrap_or_else(default_assets_dir);
    let mut app = App::bootstrap(locale, options.seed, &assets)
        .with_context(|| format!("load assets from {}", assets.display()))?;

    if let Some(key) = options.preset.as_deref() {
        let id = find_preset(&app.presets, key)
            .map(|preset| preset.id.clone())
            .with_context(|| format!("unknown preset {key}"))?;
        app.preset_cursor = app
            .presets
            .iter()
            .position(|preset| preset.id == id)
            .unwrap_or(0);
        app.load_selected_preset();
    }
    if let Some(path) = options.roster_file.as_ref() {
        let text = read_roster(path)?;
        app.session.set_raw_text(text);
    }
    if let Some(count) = options.count {
        app.session.set_requested(count);
    }
    if let Some(dedupe) = options.dedupe {
        app.session.set_dedupe(dedupe);
    }

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    stdout
        .execute(EnableBracketedPaste)
        .context("enable bracketed paste")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    info!(seed = app.session.seed(), locale = locale.code(), "cui started");
    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args)?;
    run(options)
}

fn parse_options(args: &[String]) -> Result<LaunchOptions> {
    let mut options = LaunchOptions {
        locale: std::env::var("ROLLDRAW_LANG").ok(),
        ..LaunchOptions::default()
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    options.locale = Some(value.clone());
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--file" | "-f" => {
                if let Some(value) = args.get(idx + 1) {
                    options.roster_file = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--preset" => {
                if let Some(value) = args.get(idx + 1) {
                    options.preset = Some(value.clone());
                    idx += 1;
                }
            }
            "--count" | "-n" => {
                if let Some(value) = args.get(idx + 1) {
                    let count = value
                        .parse::<f64>()
                        .with_context(|| format!("invalid --count {value}"))?;
                    options.count = Some(count);
                    idx += 1;
                }
            }
            "--no-dedupe" => options.dedupe = Some(false),
            _ => {}
        }
        idx += 1;
    }
    Ok(options)
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(120);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(app.poll_timeout(Instant::now(), tick_rate))? {
            match event::read()? {
                CEvent::Key(key) => {
                    if key.kind == KeyEventKind::Press && !app.handle_modal_key(key) {
                        let action = input::map_key(key);
                        actions::dispatch(app, action);
                    }
                }
                CEvent::Paste(text) => app.paste(&text),
                _ => {}
            }
        }
        app.on_tick(Instant::now());
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "rolldraw-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

/// The screen belongs to the UI, so logs only go to `ROLLDRAW_LOG_FILE` when it is set.
fn init_file_logging() -> Result<()> {
    let Some(path) = std::env::var_os("ROLLDRAW_LOG_FILE") else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", PathBuf::from(&path).display()))?;
    let filter =
        EnvFilter::try_from_env("ROLLDRAW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_launch_flags() {
        let options = parse_options(&args(&[
            "--lang", "zh_CN", "--seed", "42", "--preset", "demo", "-n", "3", "--no-dedupe",
        ]))
        .expect("parse");
        assert_eq!(options.locale.as_deref(), Some("zh_CN"));
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.preset.as_deref(), Some("demo"));
        assert_eq!(options.count, Some(3.0));
        assert_eq!(options.dedupe, Some(false));
    }

    #[test]
    fn rejects_non_numeric_count() {
        assert!(parse_options(&args(&["--count", "many"])).is_err());
    }
}
