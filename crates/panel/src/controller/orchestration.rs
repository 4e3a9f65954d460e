//! Command routing from host triggers to state machine inputs.

use shared::domain::Selection;
use tracing::debug;

use crate::{
    backend_bridge::commands::Trigger,
    controller::events::{Notice, PanelInput},
};

pub const NO_EDITOR_MESSAGE: &str = "ContextSync: No active text editor.";
pub const EMPTY_EXPLAIN_MESSAGE: &str = "Please highlight some code to explain.";
pub const EMPTY_CONTEXT_MESSAGE: &str = "Please highlight some code to view context.";

#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Forward(PanelInput),
    /// Precondition failed; the state machine is not invoked.
    Reject(Notice),
}

pub fn route_trigger(trigger: Trigger) -> Routed {
    let routed = match trigger {
        Trigger::ExplainSelection(selection) => {
            require_selection(selection, EMPTY_EXPLAIN_MESSAGE, PanelInput::Explain)
        }
        Trigger::ShowContextForSelection(selection) => {
            require_selection(selection, EMPTY_CONTEXT_MESSAGE, PanelInput::ShowContext)
        }
        Trigger::SyncNow => Routed::Forward(PanelInput::Sync),
        Trigger::CopyContent(text) => Routed::Forward(PanelInput::Copy(text)),
    };
    if let Routed::Reject(notice) = &routed {
        debug!(reason = %notice.message, "rejected trigger");
    }
    routed
}

fn require_selection(
    selection: Option<Selection>,
    empty_message: &str,
    input: fn(Selection) -> PanelInput,
) -> Routed {
    match selection {
        None => Routed::Reject(Notice::warning(NO_EDITOR_MESSAGE)),
        Some(selection) if selection.is_blank() => Routed::Reject(Notice::warning(empty_message)),
        Some(selection) => Routed::Forward(input(selection)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::LineRange;

    fn selection(code: &str) -> Selection {
        Selection::new(code, "a.py", LineRange::new(1, 2).unwrap())
    }

    #[test]
    fn forwards_non_blank_selection() {
        assert_eq!(
            route_trigger(Trigger::ExplainSelection(Some(selection("x = 1")))),
            Routed::Forward(PanelInput::Explain(selection("x = 1")))
        );
        assert_eq!(
            route_trigger(Trigger::ShowContextForSelection(Some(selection("x = 1")))),
            Routed::Forward(PanelInput::ShowContext(selection("x = 1")))
        );
    }

    #[test]
    fn rejects_whitespace_selection_with_command_specific_warning() {
        assert_eq!(
            route_trigger(Trigger::ExplainSelection(Some(selection("  \n\t")))),
            Routed::Reject(Notice::warning(EMPTY_EXPLAIN_MESSAGE))
        );
        assert_eq!(
            route_trigger(Trigger::ShowContextForSelection(Some(selection("")))),
            Routed::Reject(Notice::warning(EMPTY_CONTEXT_MESSAGE))
        );
    }

    #[test]
    fn rejects_missing_editor() {
        assert_eq!(
            route_trigger(Trigger::ExplainSelection(None)),
            Routed::Reject(Notice::warning(NO_EDITOR_MESSAGE))
        );
    }

    #[test]
    fn panel_triggers_always_forward() {
        assert_eq!(
            route_trigger(Trigger::SyncNow),
            Routed::Forward(PanelInput::Sync)
        );
        assert_eq!(
            route_trigger(Trigger::CopyContent("md".into())),
            Routed::Forward(PanelInput::Copy("md".into()))
        );
    }
}
