use crate::clipboard::{default_clipboard, CuiClipboard};
use rolldraw_core::{CopyError, DrawConfig, DrawPorts, Locale, Notice};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub error: bool,
    pub expires_at: Instant,
}

/// Screen-side state the session writes into: toasts, the flashing name, the result rows and
/// the celebration window.
pub struct CuiPorts {
    locale: Locale,
    config: DrawConfig,
    toasts: VecDeque<Toast>,
    frame: Option<String>,
    result_rows: Vec<String>,
    celebration: Option<(Instant, Instant)>,
    clipboard: CuiClipboard,
}

impl CuiPorts {
    pub fn new(locale: Locale, config: &DrawConfig) -> Self {
        Self::with_clipboard(locale, config, default_clipboard())
    }

    pub fn with_clipboard(locale: Locale, config: &DrawConfig, clipboard: CuiClipboard) -> Self {
        Self {
            locale,
            config: config.clone().sanitized(),
            toasts: VecDeque::new(),
            frame: None,
            result_rows: Vec::new(),
            celebration: None,
            clipboard,
        }
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> + '_ {
        self.toasts.iter()
    }

    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    pub fn result_rows(&self) -> &[String] {
        &self.result_rows
    }

    /// Milliseconds into the running celebration, if one is showing at `now`.
    pub fn celebration_phase(&self, now: Instant) -> Option<u128> {
        let (started, until) = self.celebration?;
        (now < until).then(|| now.saturating_duration_since(started).as_millis())
    }

    pub fn dismiss_toasts(&mut self) {
        self.toasts.clear();
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
        if matches!(self.celebration, Some((_, until)) if until <= now) {
            self.celebration = None;
        }
    }

    fn push_toast(&mut self, notice: &Notice, now: Instant) {
        if self.toasts.len() >= MAX_TOASTS {
            let _ = self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            title: notice.title(self.locale),
            description: notice.description(self.locale),
            error: notice.is_error(),
            expires_at: now + self.config.toast_ttl(),
        });
    }
}

pub fn result_row(index: usize, name: &str) -> String {
    format!("NO.{} {name}", index + 1)
}

impl DrawPorts for CuiPorts {
    fn notify(&mut self, notice: &Notice) {
        self.push_toast(notice, Instant::now());
    }

    fn copy_text(&mut self, text: &str) -> Result<(), CopyError> {
        self.clipboard.copy_text(text)
    }

    fn render_spin_frame(&mut self, name: Option<&str>) {
        // Not called on reveal, so the last flashing name stays up until a reset.
        self.frame = name.map(str::to_string);
    }

    fn render_result(&mut self, result: &[String]) {
        self.result_rows = result
            .iter()
            .enumerate()
            .map(|(idx, name)| result_row(idx, name))
            .collect();
    }

    fn celebrate(&mut self, bursts: u32) {
        if bursts == 0 {
            return;
        }
        let now = Instant::now();
        let span = self.config.celebration_span_for(bursts);
        self.celebration = Some((now, now.checked_add(span).unwrap_or(now)));
    }
}
