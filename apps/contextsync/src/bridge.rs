//! Newline-delimited JSON bridge: editor messages on stdin, host events on stdout.

use std::sync::Arc;

use anyhow::Result;
use client_core::ContextTransport;
use panel::{parse_panel_message, PanelRuntime, PanelState, Trigger};
use serde::Deserialize;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info, warn};

use crate::{host::StdioHost, selection::SelectionPayload};

const TRIGGER_QUEUE_DEPTH: usize = 64;

/// Editor-originated commands. Panel-originated ones (`sync`, `copy`) share the same stream.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum EditorMessage {
    Explain {
        #[serde(default)]
        selection: Option<serde_json::Value>,
    },
    ShowContext {
        #[serde(default)]
        selection: Option<serde_json::Value>,
    },
}

pub fn decode_line(line: &str) -> Option<Trigger> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<EditorMessage>(line) {
        Ok(EditorMessage::Explain { selection }) => {
            Some(Trigger::ExplainSelection(into_selection(selection)))
        }
        Ok(EditorMessage::ShowContext { selection }) => {
            Some(Trigger::ShowContextForSelection(into_selection(selection)))
        }
        Err(_) => parse_panel_message(line),
    }
}

fn into_selection(payload: Option<serde_json::Value>) -> Option<shared::domain::Selection> {
    // A selection that cannot be used is treated like no active editor.
    let payload = payload.filter(|value| !value.is_null())?;
    let payload = match serde_json::from_value::<SelectionPayload>(payload) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("dropping malformed selection: {err}");
            return None;
        }
    };
    match payload.into_selection() {
        Ok(selection) => Some(selection),
        Err(err) => {
            warn!("dropping selection: {err}");
            None
        }
    }
}

pub async fn serve(
    transport: Arc<dyn ContextTransport>,
    state: PanelState,
    use_system_clipboard: bool,
) -> Result<()> {
    let (tx, rx) = mpsc::channel(TRIGGER_QUEUE_DEPTH);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(trigger) = decode_line(&line) else {
                        continue;
                    };
                    debug!(command = trigger.name(), "received editor message");
                    if tx.send(trigger).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
    });

    let host = StdioHost::new(std::io::stdout(), use_system_clipboard);
    let mut runtime = PanelRuntime::new(transport, host, state);
    runtime.open();
    info!("stdio bridge ready");
    runtime.run(rx).await;
    reader.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_editor_selection() {
        let line = r#"{"command":"explain","selection":{"code":"def f(): pass","file_path":"a.py","start_line":3,"end_line":3}}"#;
        match decode_line(line) {
            Some(Trigger::ExplainSelection(Some(selection))) => {
                assert_eq!(selection.code, "def f(): pass");
                assert_eq!(selection.lines.wire_format(), "3-3");
            }
            other => panic!("unexpected trigger {other:?}"),
        }
    }

    #[test]
    fn missing_selection_means_no_active_editor() {
        assert_eq!(
            decode_line(r#"{"command":"show_context"}"#),
            Some(Trigger::ShowContextForSelection(None))
        );
    }

    #[test]
    fn malformed_selection_still_reaches_the_router() {
        assert_eq!(
            decode_line(r#"{"command":"explain","selection":{"code":"x","start_line":1,"end_line":1}}"#),
            Some(Trigger::ExplainSelection(None))
        );
        assert_eq!(
            decode_line(r#"{"command":"show_context","selection":{"code":"x","file_path":"a.py","start_line":0,"end_line":1}}"#),
            Some(Trigger::ShowContextForSelection(None))
        );
        assert_eq!(
            decode_line(r#"{"command":"explain","selection":null}"#),
            Some(Trigger::ExplainSelection(None))
        );
    }

    #[test]
    fn falls_back_to_panel_messages() {
        assert_eq!(decode_line(r#"{"command":"sync"}"#), Some(Trigger::SyncNow));
        assert_eq!(
            decode_line(r#"{"command":"copy","text":"md"}"#),
            Some(Trigger::CopyContent("md".into()))
        );
        assert_eq!(decode_line("   "), None);
        assert_eq!(decode_line(r#"{"command":"unknown"}"#), None);
    }
}
