//! Panel hosts for terminal use and for the newline-delimited JSON bridge.

use std::io::Write;

use arboard::Clipboard;
use panel::{Notice, NoticeLevel, PanelHost};
use serde::Serialize;
use tracing::{error, warn};

fn system_clipboard_write(text: &str) -> Result<(), String> {
    let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
    clipboard.set_text(text.to_string()).map_err(|err| err.to_string())
}

/// Keeps the latest document; notices go to stderr.
#[derive(Default)]
pub struct TerminalHost {
    latest: Option<String>,
}

impl TerminalHost {
    pub fn latest_document(&self) -> Option<&str> {
        self.latest.as_deref()
    }
}

impl PanelHost for TerminalHost {
    fn render(&mut self, document: &str) {
        self.latest = Some(document.to_string());
    }

    fn notify(&mut self, notice: &Notice) {
        let label = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        eprintln!("{label}: {}", notice.message);
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), String> {
        system_clipboard_write(text)
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent<'a> {
    Render { document: &'a str },
    Notify { level: NoticeLevel, message: &'a str },
    Focus,
    Clipboard { text: &'a str },
}

/// Writes one JSON event per line to `out`.
pub struct StdioHost<W: Write> {
    out: W,
    use_system_clipboard: bool,
}

impl<W: Write> StdioHost<W> {
    pub fn new(out: W, use_system_clipboard: bool) -> Self {
        Self {
            out,
            use_system_clipboard,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &HostEvent<'_>) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            error!("failed to write host event: {err}");
        }
    }
}

impl<W: Write> PanelHost for StdioHost<W> {
    fn render(&mut self, document: &str) {
        self.emit(&HostEvent::Render { document });
    }

    fn notify(&mut self, notice: &Notice) {
        self.emit(&HostEvent::Notify {
            level: notice.level,
            message: &notice.message,
        });
    }

    fn focus(&mut self) {
        self.emit(&HostEvent::Focus);
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), String> {
        if self.use_system_clipboard {
            match system_clipboard_write(text) {
                Ok(()) => return Ok(()),
                Err(err) => warn!("system clipboard unavailable, handing text to editor: {err}"),
            }
        }
        self.emit(&HostEvent::Clipboard { text });
        Ok(())
    }
}
