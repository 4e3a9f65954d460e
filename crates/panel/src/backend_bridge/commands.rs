//! Triggers queued from the host (editor commands and panel messages) to the panel runtime.

use serde::Deserialize;
use shared::domain::Selection;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// `None` when the host has no active text editor.
    ExplainSelection(Option<Selection>),
    ShowContextForSelection(Option<Selection>),
    SyncNow,
    CopyContent(String),
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExplainSelection(_) => "explain_selection",
            Self::ShowContextForSelection(_) => "show_context_for_selection",
            Self::SyncNow => "sync_now",
            Self::CopyContent(_) => "copy_content",
        }
    }
}

/// Messages posted by the rendered panel document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PanelMessage {
    Sync,
    Copy { text: String },
}

impl From<PanelMessage> for Trigger {
    fn from(message: PanelMessage) -> Self {
        match message {
            PanelMessage::Sync => Trigger::SyncNow,
            PanelMessage::Copy { text } => Trigger::CopyContent(text),
        }
    }
}

/// Decodes a panel message; anything unrecognized is dropped.
pub fn parse_panel_message(raw: &str) -> Option<Trigger> {
    match serde_json::from_str::<PanelMessage>(raw) {
        Ok(message) => Some(message.into()),
        Err(err) => {
            warn!("ignoring unrecognized panel message: {err}");
            None
        }
    }
}
