//! View state machine: owns the single current view and turns inputs into effects.

use shared::{
    domain::Generation,
    protocol::{ContextItem, ExplainRequest, ExplainResult, RetrieveRequest},
};
use tracing::{debug, warn};

use crate::controller::events::{failure_message, sync_notice, Notice, PanelInput, RequestKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Welcome,
    Loading,
    Explained(ExplainResult),
    ContextList(Vec<ContextItem>),
    Failed(String),
}

impl ViewState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Loading => "loading",
            Self::Explained(_) => "explained",
            Self::ContextList(_) => "context_list",
            Self::Failed(_) => "failed",
        }
    }
}

/// Work the runtime performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Render,
    FocusPanel,
    Notify(Notice),
    IssueExplain {
        generation: Generation,
        request: ExplainRequest,
    },
    IssueRetrieve {
        generation: Generation,
        request: RetrieveRequest,
    },
    IssueSync,
    CopyToClipboard(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRequest {
    generation: Generation,
    kind: RequestKind,
}

#[derive(Debug, Clone)]
pub struct PanelState {
    view: ViewState,
    issued: Generation,
    pending: Option<PendingRequest>,
    last_retrieve: Option<RetrieveRequest>,
    refresh_after_sync: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            view: ViewState::Welcome,
            issued: Generation::default(),
            pending: None,
            last_retrieve: None,
            refresh_after_sync: false,
        }
    }

    pub fn with_refresh_after_sync(mut self, refresh_after_sync: bool) -> Self {
        self.refresh_after_sync = refresh_after_sync;
        self
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Generation of the outstanding explain/retrieve, if the panel is waiting on one.
    pub fn pending_generation(&self) -> Option<Generation> {
        self.pending.map(|pending| pending.generation)
    }

    pub fn apply(&mut self, input: PanelInput) -> Vec<Effect> {
        debug!(input = input.name(), view = self.view.label(), "applying panel input");
        match input {
            PanelInput::Explain(selection) => {
                let generation = self.begin(RequestKind::Explain);
                vec![
                    Effect::Render,
                    Effect::IssueExplain {
                        generation,
                        request: ExplainRequest::from(&selection),
                    },
                    Effect::FocusPanel,
                ]
            }
            PanelInput::ShowContext(selection) => {
                let request = RetrieveRequest::from(&selection);
                let mut effects = self.begin_retrieve(request);
                effects.push(Effect::FocusPanel);
                effects
            }
            PanelInput::Sync => {
                if matches!(self.view, ViewState::ContextList(_)) {
                    vec![Effect::IssueSync]
                } else {
                    warn!(view = self.view.label(), "ignoring sync outside the context list");
                    Vec::new()
                }
            }
            PanelInput::Copy(text) => {
                // An empty panel payload falls back to the explanation source.
                let text = match (text.trim().is_empty(), &self.view) {
                    (false, _) => text,
                    (true, ViewState::Explained(result)) => result.markdown.clone(),
                    (true, _) => return vec![Effect::Notify(Notice::warning("Nothing to copy."))],
                };
                vec![Effect::CopyToClipboard(text)]
            }
            PanelInput::ClipboardWritten(Ok(())) => {
                vec![Effect::Notify(Notice::info("Copied to clipboard!"))]
            }
            PanelInput::ClipboardWritten(Err(err)) => {
                vec![Effect::Notify(Notice::error(format!("Copy failed: {err}")))]
            }
            PanelInput::ExplainSettled {
                generation,
                outcome,
            } => {
                if !self.settle(generation, RequestKind::Explain) {
                    return Vec::new();
                }
                self.view = match outcome {
                    Ok(result) => ViewState::Explained(result),
                    Err(err) => {
                        warn!(%generation, "explain failed: {err}");
                        ViewState::Failed(failure_message(RequestKind::Explain, &err))
                    }
                };
                vec![Effect::Render]
            }
            PanelInput::ContextSettled {
                generation,
                outcome,
            } => {
                if !self.settle(generation, RequestKind::Retrieve) {
                    return Vec::new();
                }
                self.view = match outcome {
                    Ok(items) => ViewState::ContextList(items),
                    Err(err) => {
                        warn!(%generation, "context retrieval failed: {err}");
                        ViewState::Failed(failure_message(RequestKind::Retrieve, &err))
                    }
                };
                vec![Effect::Render]
            }
            PanelInput::SyncSettled(outcome) => {
                let mut effects = vec![Effect::Notify(sync_notice(&outcome))];
                if outcome.is_ok() && self.refresh_after_sync {
                    effects.extend(self.refresh_context_list());
                }
                effects
            }
        }
    }

    fn begin(&mut self, kind: RequestKind) -> Generation {
        self.issued = self.issued.next();
        if let Some(superseded) = self.pending {
            debug!(
                superseded = %superseded.generation,
                generation = %self.issued,
                "new request supersedes outstanding one"
            );
        }
        self.pending = Some(PendingRequest {
            generation: self.issued,
            kind,
        });
        self.view = ViewState::Loading;
        self.issued
    }

    fn begin_retrieve(&mut self, request: RetrieveRequest) -> Vec<Effect> {
        let generation = self.begin(RequestKind::Retrieve);
        self.last_retrieve = Some(request.clone());
        vec![
            Effect::Render,
            Effect::IssueRetrieve {
                generation,
                request,
            },
        ]
    }

    fn settle(&mut self, generation: Generation, kind: RequestKind) -> bool {
        match self.pending {
            Some(pending) if pending.generation == generation && pending.kind == kind => {
                self.pending = None;
                true
            }
            _ => {
                debug!(%generation, latest = %self.issued, "discarding stale settlement");
                false
            }
        }
    }

    fn refresh_context_list(&mut self) -> Vec<Effect> {
        if self.pending.is_some() || !matches!(self.view, ViewState::ContextList(_)) {
            return Vec::new();
        }
        match self.last_retrieve.clone() {
            Some(request) => self.begin_retrieve(request),
            None => Vec::new(),
        }
    }
}

/// Owned-state form of [`PanelState::apply`].
pub fn transition(mut state: PanelState, input: PanelInput) -> (PanelState, Vec<Effect>) {
    let effects = state.apply(input);
    (state, effects)
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
