use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rolldraw_core::{Clipboard, CopyError, FallbackClipboard};
use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

pub type CuiClipboard = FallbackClipboard<SystemClipboard, Osc52Clipboard>;

pub fn default_clipboard() -> CuiClipboard {
    FallbackClipboard::new(SystemClipboard::detect(), Osc52Clipboard)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Pipes text into the first platform clipboard tool that accepts it.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    commands: Vec<ClipboardCommand>,
}

impl SystemClipboard {
    pub fn with_commands(commands: Vec<ClipboardCommand>) -> Self {
        Self { commands }
    }

    pub fn detect() -> Self {
        let mut commands = Vec::new();
        if cfg!(target_os = "macos") {
            commands.push(ClipboardCommand {
                program: "pbcopy",
                args: &[],
            });
        } else if cfg!(windows) {
            commands.push(ClipboardCommand {
                program: "clip.exe",
                args: &[],
            });
        } else {
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                commands.push(ClipboardCommand {
                    program: "wl-copy",
                    args: &[],
                });
            }
            commands.push(ClipboardCommand {
                program: "xclip",
                args: &["-selection", "clipboard"],
            });
            commands.push(ClipboardCommand {
                program: "xsel",
                args: &["--clipboard", "--input"],
            });
            // WSL exposes the Windows clipboard tool on PATH.
            commands.push(ClipboardCommand {
                program: "clip.exe",
                args: &[],
            });
        }
        Self { commands }
    }

    fn pipe_into(command: &ClipboardCommand, text: &str) -> io::Result<bool> {
        let mut child = Command::new(command.program)
            .args(command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        // Reap the child even when the write failed.
        let status = child.wait()?;
        written?;
        Ok(status.success())
    }
}

impl Clipboard for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn copy(&mut self, text: &str) -> Result<(), CopyError> {
        let mut last_error = None;
        for command in &self.commands {
            match Self::pipe_into(command, text) {
                Ok(true) => return Ok(()),
                Ok(false) => last_error = Some(format!("{} exited with failure", command.program)),
                Err(err) => last_error = Some(format!("{}: {err}", command.program)),
            }
        }
        Err(CopyError::Unavailable(
            last_error.unwrap_or_else(|| "no clipboard command".to_string()),
        ))
    }
}

/// Asks the terminal emulator to set the clipboard through an OSC 52 escape sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Osc52Clipboard;

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

impl Clipboard for Osc52Clipboard {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn copy(&mut self, text: &str) -> Result<(), CopyError> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(CopyError::Unavailable("stdout is not a terminal".to_string()));
        }
        stdout
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|err| CopyError::Failed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_wraps_base64_payload() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
        assert_eq!(
            osc52_sequence("张三"),
            format!("\x1b]52;c;{}\x07", STANDARD.encode("张三"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn tool_closing_stdin_early_is_reaped() {
        let payload = "x".repeat(1 << 20);
        let mut clipboard = SystemClipboard::with_commands(vec![ClipboardCommand {
            program: "true",
            args: &[],
        }]);
        // `true` exits without reading, so the write overflows the pipe and fails.
        assert!(matches!(
            clipboard.copy(&payload),
            Err(CopyError::Unavailable(reason)) if reason.starts_with("true")
        ));
        let status = SystemClipboard::pipe_into(
            &ClipboardCommand {
                program: "false",
                args: &[],
            },
            "",
        )
        .expect("spawn");
        assert!(!status);
    }

    #[test]
    fn missing_tools_report_unavailable() {
        let mut clipboard = SystemClipboard::with_commands(vec![ClipboardCommand {
            program: "rolldraw-no-such-clipboard-tool",
            args: &[],
        }]);
        assert!(matches!(
            clipboard.copy("x"),
            Err(CopyError::Unavailable(reason)) if reason.contains("rolldraw-no-such")
        ));
        let mut empty = SystemClipboard::with_commands(Vec::new());
        assert_eq!(
            empty.copy("x"),
            Err(CopyError::Unavailable("no clipboard command".to_string()))
        );
    }
}
