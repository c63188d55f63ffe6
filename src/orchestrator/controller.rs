//! Lookup lifecycle controller.
//!
//! Owns the single active lookup, its timeout, outcome classification and alert
//! gating, and emits events for presentation layers.

use super::alert_gate::AlertGate;
use crate::engine::CreatureSource;
use crate::model::{LookupError, LookupEvent, LookupResult, Query};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    /// Raw user input; trimmed and lower-cased by the controller.
    Lookup(String),
    Quit,
}

type LookupOutcome = Result<LookupResult, LookupError>;

/// Internal handle for a pending lookup. Each one has its own task and timer.
struct ActiveLookup {
    query: Query,
    handle: JoinHandle<LookupOutcome>,
}

pub(crate) struct LookupController<S> {
    source: Arc<S>,
    timeout: Duration,
    gate: AlertGate,
    event_tx: UnboundedSender<LookupEvent>,
    active: Option<ActiveLookup>,
}

impl<S: CreatureSource> LookupController<S> {
    pub fn new(source: S, timeout: Duration, event_tx: UnboundedSender<LookupEvent>) -> Self {
        Self {
            source: Arc::new(source),
            timeout,
            gate: AlertGate::default(),
            event_tx,
            active: None,
        }
    }

    /// Look up `query` and wait for the outcome.
    pub async fn lookup(&mut self, query: Query) -> LookupOutcome {
        self.start(query);
        let joined = self.next_completion().await;
        self.settle(joined)
    }

    /// Spawn a lookup for `query`. A lookup still pending is aborted first so
    /// its late result can never be observed.
    pub fn start(&mut self, query: Query) {
        self.supersede_active();

        info!(%query, "lookup started");
        let _ = self.event_tx.send(LookupEvent::Started {
            query: query.clone(),
        });

        let source = Arc::clone(&self.source);
        let timeout = self.timeout;
        let task_query = query.clone();
        let handle = tokio::spawn(async move {
            match tokio::time::timeout(timeout, source.fetch(&task_query)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(LookupError::Timeout(timeout.as_millis() as u64)),
            }
        });

        self.active = Some(ActiveLookup { query, handle });
    }

    /// Abort the pending lookup, if any, without touching alert state.
    pub fn cancel(&mut self) {
        self.supersede_active();
    }

    fn supersede_active(&mut self) {
        if let Some(prev) = self.active.take() {
            prev.handle.abort();
            debug!(query = %prev.query, "pending lookup superseded");
            let _ = self.event_tx.send(LookupEvent::Failed {
                query: prev.query,
                error: LookupError::Superseded,
            });
        }
    }

    /// Resolves when the active lookup finishes; never resolves while idle.
    /// Cancel-safe: the handle stays in place until `settle` takes it.
    async fn next_completion(&mut self) -> Result<LookupOutcome, JoinError> {
        match self.active.as_mut() {
            Some(active) => (&mut active.handle).await,
            None => futures::future::pending().await,
        }
    }

    /// Classify a finished lookup, update alert state and notify listeners.
    fn settle(&mut self, joined: Result<LookupOutcome, JoinError>) -> LookupOutcome {
        let Some(active) = self.active.take() else {
            return Err(LookupError::Superseded);
        };
        let query = active.query;

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Err(LookupError::Superseded),
            Err(e) => Err(LookupError::Network(format!("lookup task failed: {e}"))),
        };

        match &outcome {
            Ok(result) => {
                self.gate.record_success();
                info!(%query, id = result.id, name = %result.name, "lookup succeeded");
                let _ = self.event_tx.send(LookupEvent::Completed {
                    result: Box::new(result.clone()),
                });
            }
            Err(error) => {
                warn!(%query, %error, "lookup failed");
                let _ = self.event_tx.send(LookupEvent::Failed {
                    query: query.clone(),
                    error: error.clone(),
                });
                match self.gate.record_failure(error) {
                    Some(alert) => {
                        let _ = self.event_tx.send(LookupEvent::Alert(alert));
                    }
                    None => debug!(%query, "alert suppressed for this failure streak"),
                }
            }
        }

        outcome
    }
}

/// Drive lookups from UI commands until quit, emitting events back to the UI.
pub(crate) async fn run_controller<S: CreatureSource>(
    mut controller: LookupController<S>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Lookup(raw)) => {
                        controller.start(Query::from_input(&raw));
                    }
                    Some(UiCommand::Quit) | None => {
                        controller.cancel();
                        break Ok(());
                    }
                }
            }
            // Polls the handle in place; a command arriving first leaves it untouched.
            joined = controller.next_completion() => {
                let _ = controller.settle(joined);
            }
        }
    }
}
