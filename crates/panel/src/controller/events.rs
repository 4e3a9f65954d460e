//! Inputs to the view state machine and user-facing notice modeling.

use serde::Serialize;
use shared::{
    domain::{Generation, Selection},
    error::TransportError,
    protocol::{ContextItem, ExplainResult, SyncResult},
};

pub const DISCONNECTED_MESSAGE: &str =
    "Context Engine Disconnected. Is the context engine service running?";

/// Everything that can move the state machine. Selections arriving here are already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelInput {
    Explain(Selection),
    ShowContext(Selection),
    Sync,
    Copy(String),
    ExplainSettled {
        generation: Generation,
        outcome: Result<ExplainResult, TransportError>,
    },
    ContextSettled {
        generation: Generation,
        outcome: Result<Vec<ContextItem>, TransportError>,
    },
    SyncSettled(Result<SyncResult, TransportError>),
    ClipboardWritten(Result<(), String>),
}

impl PanelInput {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Explain(_) => "explain",
            Self::ShowContext(_) => "show_context",
            Self::Sync => "sync",
            Self::Copy(_) => "copy",
            Self::ExplainSettled { .. } => "explain_settled",
            Self::ContextSettled { .. } => "context_settled",
            Self::SyncSettled(_) => "sync_settled",
            Self::ClipboardWritten(_) => "clipboard_written",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient host notification; never part of the view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Explain,
    Retrieve,
}

/// Message shown in the `Failed` view for a failed explain/retrieve.
pub fn failure_message(kind: RequestKind, err: &TransportError) -> String {
    match err {
        TransportError::ConnectionRefused(_) => DISCONNECTED_MESSAGE.to_string(),
        TransportError::ServerError(status) => format!("Error: Server returned {status}"),
        TransportError::MalformedResponse(_) => match kind {
            RequestKind::Explain => "Failed to parse response.".to_string(),
            RequestKind::Retrieve => "Failed to parse context response.".to_string(),
        },
    }
}

pub fn sync_notice(outcome: &Result<SyncResult, TransportError>) -> Notice {
    match outcome {
        Ok(result) => Notice::info(format!(
            "Synced {} items from Slack/Jira",
            result.items_synced
        )),
        Err(TransportError::MalformedResponse(_)) => {
            Notice::warning("Sync completed but response was invalid.")
        }
        Err(TransportError::ServerError(status)) => Notice::error(format!("Sync failed: {status}")),
        Err(TransportError::ConnectionRefused(_)) => {
            Notice::error("Sync failed: Server unreachable")
        }
    }
}
