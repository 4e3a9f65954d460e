//! Runtime bridge between host triggers, the state machine, and in-flight transport calls.
//!
//! Everything runs on one control flow: requests are polled from a [`FuturesUnordered`]
//! alongside the trigger queue, never spawned, so settlements re-enter the state machine
//! one at a time.

use std::{collections::VecDeque, sync::Arc};

use client_core::ContextTransport;
use futures::{future::BoxFuture, stream::FuturesUnordered, FutureExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    backend_bridge::commands::Trigger,
    controller::{
        events::PanelInput,
        orchestration::{route_trigger, Routed},
        reducer::{Effect, PanelState},
    },
    host::PanelHost,
    ui::render::render,
};

pub struct PanelRuntime<H: PanelHost> {
    state: PanelState,
    transport: Arc<dyn ContextTransport>,
    host: H,
    in_flight: FuturesUnordered<BoxFuture<'static, PanelInput>>,
}

enum Step {
    Trigger(Option<Trigger>),
    Settled(Option<PanelInput>),
    Idle,
}

impl<H: PanelHost> PanelRuntime<H> {
    pub fn new(transport: Arc<dyn ContextTransport>, host: H, state: PanelState) -> Self {
        Self {
            state,
            transport,
            host,
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Paints the current view; call once when the panel opens.
    pub fn open(&mut self) {
        self.run_effects(vec![Effect::Render]);
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn handle_trigger(&mut self, trigger: Trigger) {
        let name = trigger.name();
        match route_trigger(trigger) {
            Routed::Forward(input) => {
                debug!(command = name, "forwarding trigger");
                self.apply(input);
            }
            Routed::Reject(notice) => self.host.notify(&notice),
        }
    }

    /// Waits for the next outstanding call and feeds its outcome back. Returns `false` when
    /// nothing was in flight.
    pub async fn settle_next(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(input) => {
                self.apply(input);
                true
            }
            None => false,
        }
    }

    pub async fn drain(&mut self) {
        while self.settle_next().await {}
    }

    /// Serves triggers until the queue closes and every outstanding call has settled.
    pub async fn run(mut self, mut triggers: mpsc::Receiver<Trigger>) -> H {
        let mut open = true;
        loop {
            let step = tokio::select! {
                trigger = triggers.recv(), if open => Step::Trigger(trigger),
                settled = self.in_flight.next(), if !self.in_flight.is_empty() => Step::Settled(settled),
                else => Step::Idle,
            };
            match step {
                Step::Trigger(Some(trigger)) => self.handle_trigger(trigger),
                Step::Trigger(None) => {
                    debug!(in_flight = self.in_flight.len(), "trigger queue closed");
                    open = false;
                }
                Step::Settled(Some(input)) => self.apply(input),
                Step::Settled(None) | Step::Idle => {
                    if !open {
                        break;
                    }
                }
            }
        }
        info!(view = self.state.view().label(), "panel runtime stopped");
        self.host
    }

    fn apply(&mut self, input: PanelInput) {
        let effects = self.state.apply(input);
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Render => self.host.render(&render(self.state.view())),
                Effect::FocusPanel => self.host.focus(),
                Effect::Notify(notice) => self.host.notify(&notice),
                Effect::IssueExplain {
                    generation,
                    request,
                } => {
                    debug!(%generation, "issuing explain");
                    let transport = Arc::clone(&self.transport);
                    self.in_flight.push(
                        async move {
                            let outcome = transport.explain(&request).await;
                            PanelInput::ExplainSettled {
                                generation,
                                outcome,
                            }
                        }
                        .boxed(),
                    );
                }
                Effect::IssueRetrieve {
                    generation,
                    request,
                } => {
                    debug!(%generation, "issuing context retrieval");
                    let transport = Arc::clone(&self.transport);
                    self.in_flight.push(
                        async move {
                            let outcome = transport.retrieve_context(&request).await;
                            PanelInput::ContextSettled {
                                generation,
                                outcome,
                            }
                        }
                        .boxed(),
                    );
                }
                Effect::IssueSync => {
                    debug!("issuing sync");
                    let transport = Arc::clone(&self.transport);
                    self.in_flight
                        .push(async move { PanelInput::SyncSettled(transport.sync().await) }.boxed());
                }
                Effect::CopyToClipboard(text) => {
                    let written = self.host.write_clipboard(&text);
                    queue.extend(self.state.apply(PanelInput::ClipboardWritten(written)));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
