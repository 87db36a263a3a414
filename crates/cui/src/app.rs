use crate::ports::CuiPorts;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rolldraw_core::{
    DrawConfig, DrawError, DrawSession, Event, Locale, RngState, SpinStep, SpinTicket,
};
use rolldraw_data::{builtin_presets, load_draw_config, load_presets, RosterPreset};
use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::warn;

const MAX_EVENT_LOG: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Roster,
    Results,
    History,
    Events,
}

pub struct App {
    pub locale: Locale,
    pub session: DrawSession<CuiPorts>,
    pub presets: Vec<RosterPreset>,
    pub preset_cursor: usize,
    pub ticket: Option<SpinTicket>,
    pub focus: FocusPane,
    pub editing_roster: bool,
    pub count_input: Option<String>,
    pub confirm_reset: bool,
    pub show_help: bool,
    pub history_cursor: usize,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        locale: Locale,
        config: DrawConfig,
        presets: Vec<RosterPreset>,
        rng: RngState,
        ports: CuiPorts,
    ) -> Self {
        Self {
            locale,
            session: DrawSession::with_rng(config, rng, ports),
            presets,
            preset_cursor: 0,
            ticket: None,
            focus: FocusPane::Roster,
            editing_roster: false,
            count_input: None,
            confirm_reset: false,
            show_help: false,
            history_cursor: 0,
            event_log: VecDeque::new(),
            status_line: locale.text("ready", "就绪").to_string(),
            should_quit: false,
        }
    }

    pub fn bootstrap(locale: Locale, seed: Option<u64>, assets: &Path) -> Result<Self> {
        let config = load_draw_config(assets)?;
        let presets = match load_presets(assets) {
            Ok(presets) => presets,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "presets unavailable, using built-in");
                builtin_presets()
            }
        };
        let rng = match seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        };
        let ports = CuiPorts::new(locale, &config);
        let mut app = Self::new(locale, config, presets, rng, ports);
        app.push_event_line(format!(
            "{} {} | {} {}",
            locale.text("seed", "种子"),
            app.session.seed(),
            locale.text("presets", "预设"),
            app.presets.len()
        ));
        Ok(app)
    }

    /// Advances a due spin and expires toasts. Called after every input poll.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(mut ticket) = self.ticket.take() {
            if ticket.is_due(now) {
                match self.session.resume(&mut ticket, now) {
                    SpinStep::Continue => self.ticket = Some(ticket),
                    SpinStep::Revealed(winners) => {
                        self.history_cursor = 0;
                        self.push_status(format!(
                            "{} {}",
                            self.locale.text("drew", "抽中"),
                            winners.len()
                        ));
                    }
                    SpinStep::Aborted => {}
                }
            } else {
                self.ticket = Some(ticket);
            }
        }
        self.session.ports_mut().prune(now);
        self.flush_events();
    }

    /// How long the input poll may block before the spin needs another frame.
    pub fn poll_timeout(&self, now: Instant, tick_rate: Duration) -> Duration {
        match self.ticket {
            Some(ticket) => ticket.wake_at().saturating_duration_since(now).min(tick_rate),
            None => tick_rate,
        }
    }

    pub fn focus_label(&self, pane: FocusPane) -> &'static str {
        match pane {
            FocusPane::Roster => self.locale.text("Roster", "名单"),
            FocusPane::Results => self.locale.text("Results", "结果"),
            FocusPane::History => self.locale.text("History", "历史"),
            FocusPane::Events => self.locale.text("Events", "事件"),
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let order = [
            FocusPane::Roster,
            FocusPane::Results,
            FocusPane::History,
            FocusPane::Events,
        ];
        let idx = order
            .iter()
            .position(|pane| *pane == self.focus)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % order.len()
        } else {
            (idx + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    pub fn move_cursor(&mut self, down: bool) {
        match self.focus {
            FocusPane::Roster => {
                let len = self.presets.len();
                move_index(&mut self.preset_cursor, len, down);
            }
            FocusPane::History => {
                let len = self.session.history().len();
                move_index(&mut self.history_cursor, len, down);
            }
            FocusPane::Results | FocusPane::Events => {}
        }
    }

    pub fn next_hint(&self) -> String {
        if self.editing_roster {
            return self
                .locale
                .text("typing names, Esc to finish", "输入名单中，Esc 结束")
                .to_string();
        }
        if self.session.is_rolling() {
            return self.locale.text("rolling...", "抽取中...").to_string();
        }
        if self.session.candidates().is_empty() {
            return self
                .locale
                .text("e to edit roster or P to load a preset", "e 编辑名单，P 加载预设")
                .to_string();
        }
        if self.session.result().is_empty() {
            self.locale.text("d to draw", "d 开始抽取").to_string()
        } else {
            self.locale
                .text("c to copy, d to draw again", "c 复制结果，d 再抽一次")
                .to_string()
        }
    }

    pub fn count_label(&self) -> String {
        let requested = self.session.requested();
        if requested.is_finite() {
            format!("{requested}")
        } else {
            "?".to_string()
        }
    }

    pub fn start_draw(&mut self) {
        match self.session.request_draw(Instant::now()) {
            Ok(ticket) => {
                self.ticket = Some(ticket);
                self.push_status(self.locale.text("rolling", "抽取中"));
            }
            Err(DrawError::AlreadyRolling) => {
                self.push_status(self.locale.text("already rolling", "正在抽取"));
            }
            Err(err) => self.push_error(err),
        }
        self.flush_events();
    }

    pub fn copy_result(&mut self) {
        match self.session.copy_result() {
            Ok(()) => self.push_status(self.locale.text("copied", "已复制")),
            Err(err) => self.push_status(format!("{}: {err}", self.locale.text("copy", "复制"))),
        }
        self.flush_events();
    }

    pub fn toggle_dedupe(&mut self) {
        let dedupe = !self.session.roster().dedupe();
        self.session.set_dedupe(dedupe);
        self.push_status(format!(
            "{}: {}",
            self.locale.text("dedupe", "去重"),
            on_off(self.locale, dedupe)
        ));
    }

    pub fn adjust_count(&mut self, delta: i64) {
        let requested = self.session.requested();
        let base = if requested.is_finite() && requested >= 1.0 {
            requested.floor() as i64
        } else {
            self.session.config().default_count
        };
        self.session
            .set_requested(base.saturating_add(delta).max(1) as f64);
    }

    pub fn open_count_prompt(&mut self) {
        self.count_input = Some(self.count_label().replace('?', ""));
    }

    pub fn request_reset(&mut self) {
        self.confirm_reset = true;
    }

    pub fn start_roster_edit(&mut self) {
        self.editing_roster = true;
        self.focus = FocusPane::Roster;
    }

    pub fn cycle_preset(&mut self, forward: bool) {
        let len = self.presets.len();
        if len == 0 {
            return;
        }
        self.preset_cursor = if forward {
            (self.preset_cursor + 1) % len
        } else {
            (self.preset_cursor + len - 1) % len
        };
        let label = self.presets[self.preset_cursor].name.clone();
        self.push_status(format!("{}: {label}", self.locale.text("preset", "预设")));
    }

    pub fn load_selected_preset(&mut self) {
        let Some(preset) = self.presets.get(self.preset_cursor).cloned() else {
            self.push_status(self.locale.text("no presets", "没有预设"));
            return;
        };
        self.session.load_roster(&preset.name, preset.as_text());
        self.push_status(format!(
            "{} {} ({})",
            self.locale.text("loaded", "已加载"),
            preset.name,
            self.session.candidates().len()
        ));
    }

    /// Applies pasted text to whichever input is open, or appends it to the roster.
    pub fn paste(&mut self, text: &str) {
        if let Some(input) = self.count_input.as_mut() {
            input.push_str(text.trim());
            return;
        }
        let pasted = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut raw = self.session.roster().raw_text().to_string();
        raw.push_str(&pasted);
        self.session.set_raw_text(raw);
    }

    /// Keys consumed by an open dialog or by the roster editor. Returns `false` when no
    /// modal state is active.
    pub fn handle_modal_key(&mut self, key: KeyEvent) -> bool {
        if self.confirm_reset {
            self.handle_confirm_key(key);
            return true;
        }
        if self.count_input.is_some() {
            self.handle_count_key(key);
            return true;
        }
        if self.editing_roster {
            self.handle_roster_key(key);
            return true;
        }
        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_reset = false;
                self.session.reset();
                self.history_cursor = 0;
                self.push_status(self.locale.text("reset", "已重置"));
                self.flush_events();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_reset = false;
                self.push_status(self.locale.text("reset cancelled", "已取消重置"));
            }
            _ => {}
        }
    }

    fn handle_count_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.count_input = None;
            }
            KeyCode::Enter => {
                let input = self.count_input.take().unwrap_or_default();
                let default = self.session.config().default_count;
                self.session
                    .set_requested(parse_count_input(&input, default));
                self.push_status(format!(
                    "{}: {}",
                    self.locale.text("count", "人数"),
                    self.count_label()
                ));
            }
            KeyCode::Backspace => {
                if let Some(input) = self.count_input.as_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    if let Some(input) = self.count_input.as_mut() {
                        input.push(ch);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_roster_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editing_roster = false;
                self.push_status(format!(
                    "{} {}",
                    self.session.candidates().len(),
                    self.locale.text("candidates", "位候选人")
                ));
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.editing_roster = false;
            }
            KeyCode::Enter => self.session.push_char('\n'),
            KeyCode::Backspace => {
                let _ = self.session.pop_char();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    self.session.push_char(ch);
                }
            }
            _ => {}
        }
    }

    pub fn dismiss(&mut self) {
        if self.show_help {
            self.show_help = false;
        } else {
            self.session.ports_mut().dismiss_toasts();
        }
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    pub fn push_error(&mut self, err: DrawError) {
        self.status_line = format!("{}: {err}", self.locale.text("error", "错误"));
    }

    fn flush_events(&mut self) {
        let events: Vec<Event> = self.session.drain_events().collect();
        for event in events {
            if let Some(line) = format_event(self.locale, &event) {
                self.push_event_line(line);
            }
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

/// Empty input means the default count; anything unparsable becomes NaN and is rejected
/// when the draw starts.
pub fn parse_count_input(input: &str, default: i64) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return default as f64;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn on_off(locale: Locale, value: bool) -> &'static str {
    if value {
        locale.text("on", "开")
    } else {
        locale.text("off", "关")
    }
}

fn move_index(value: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *value = 0;
        return;
    }
    if down {
        *value = (*value + 1).min(len - 1);
    } else {
        *value = value.saturating_sub(1);
    }
}

fn format_event(locale: Locale, event: &Event) -> Option<String> {
    let line = match event {
        Event::DrawStarted {
            generation,
            candidates,
            drawing,
            ..
        } => format!(
            "#{generation} {} {drawing}/{candidates}",
            locale.text("draw started", "开始抽取")
        ),
        Event::DrawRejected { reason } => {
            format!("{}: {reason}", locale.text("draw rejected", "无法抽取"))
        }
        // Frames arrive every few dozen milliseconds; the log would drown in them.
        Event::SpinFrame { .. } => return None,
        Event::DrawRevealed {
            generation,
            winners,
            frames,
        } => format!(
            "#{generation} {} ({frames} {}): {}",
            locale.text("revealed", "揭晓"),
            locale.text("frames", "帧"),
            winners.join(", ")
        ),
        Event::SpinAborted { generation } => {
            format!("#{generation} {}", locale.text("spin aborted", "抽取已中止"))
        }
        Event::ResultCopied { lines } => {
            format!("{} {lines}", locale.text("copied lines", "已复制行数"))
        }
        Event::CopyFailed { reason } => {
            format!("{}: {reason}", locale.text("copy failed", "复制失败"))
        }
        Event::SessionReset => locale.text("session reset", "已重置").to_string(),
    };
    Some(line)
}
