//! Outward calls the draw session makes. Front-ends supply the implementations.

use crate::{CopyError, Notice};

pub trait DrawPorts {
    fn notify(&mut self, notice: &Notice);

    fn copy_text(&mut self, text: &str) -> Result<(), CopyError>;

    /// Called with the flashing name on every spin frame, `None` when the display clears.
    fn render_spin_frame(&mut self, name: Option<&str>);

    fn render_result(&mut self, result: &[String]);

    fn celebrate(&mut self, _bursts: u32) {}
}

pub trait Clipboard {
    fn name(&self) -> &'static str;

    fn copy(&mut self, text: &str) -> Result<(), CopyError>;
}

/// Tries `primary` and falls back to `fallback` when it is unavailable or fails.
#[derive(Debug, Clone, Default)]
pub struct FallbackClipboard<P, F> {
    pub primary: P,
    pub fallback: F,
}

impl<P: Clipboard, F: Clipboard> FallbackClipboard<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn copy_text(&mut self, text: &str) -> Result<(), CopyError> {
        if text.is_empty() {
            return Err(CopyError::Empty);
        }
        match self.primary.copy(text) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::debug!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %err,
                    "primary clipboard failed, using fallback"
                );
                self.fallback.copy(text)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPorts;

impl DrawPorts for NoopPorts {
    fn notify(&mut self, _notice: &Notice) {}

    fn copy_text(&mut self, _text: &str) -> Result<(), CopyError> {
        Err(CopyError::Unavailable("no clipboard attached".to_string()))
    }

    fn render_spin_frame(&mut self, _name: Option<&str>) {}

    fn render_result(&mut self, _result: &[String]) {}
}
