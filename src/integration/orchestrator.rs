//! Orchestrator for the cooking session
//!
//! Runs the [`CookingSession`] on its own thread. The thread sleeps until
//! either a command arrives or the next scheduled task is due, so timer
//! ticks, word highlights and timeouts fire on time without polling.

use crate::catalog::Catalog;
use crate::integration::config::AssistantConfig;
use crate::integration::session::{CookingSession, Effect, SessionCommand, SessionSnapshot};
use crate::storage::PreferenceStore;
use crate::utils::channels::SessionChannels;
use crate::{CookeaseError, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Commands that can be sent to the orchestrator
#[derive(Debug, Clone)]
pub enum OrchestratorCommand {
    /// Forward an input to the session
    Session(SessionCommand),

    /// Shutdown the orchestrator
    Shutdown,
}

/// Events emitted by the orchestrator
#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    /// Something for the front-end to show, say or play
    Effect(Effect),

    /// Orchestrator has shut down
    Shutdown,
}

/// Handle for controlling the orchestrator from the front-end
#[derive(Clone)]
pub struct OrchestratorHandle {
    /// Command sender
    command_tx: Sender<OrchestratorCommand>,

    /// Event receiver
    event_rx: Receiver<OrchestratorEvent>,

    /// Latest session state, refreshed after every step
    snapshot: Arc<RwLock<SessionSnapshot>>,
}

impl OrchestratorHandle {
    /// Send a command to the orchestrator
    pub fn send_command(&self, cmd: OrchestratorCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| CookeaseError::ChannelError(format!("Failed to send command: {}", e)))
    }

    /// Forward a session input
    pub fn send(&self, cmd: SessionCommand) -> Result<()> {
        self.send_command(OrchestratorCommand::Session(cmd))
    }

    /// A finalized recognizer result
    pub fn transcript(&self, text: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::Transcript {
            text: text.into(),
            is_final: true,
        })
    }

    /// A typed command
    pub fn manual_command(&self, text: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::ManualCommand(text.into()))
    }

    /// Forward a synthesizer or recognizer callback without blocking.
    /// Fails when the command queue is full.
    pub fn notify(&self, cmd: SessionCommand) -> Result<()> {
        self.command_tx
            .try_send(OrchestratorCommand::Session(cmd))
            .map_err(|e| CookeaseError::ChannelError(format!("Failed to deliver callback: {}", e)))
    }

    /// Report the end of an utterance
    pub fn utterance_finished(&self, utterance: Uuid) -> Result<()> {
        self.notify(SessionCommand::UtteranceFinished(utterance))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send_command(OrchestratorCommand::Shutdown)
    }

    /// Wait up to `timeout` for an event
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<OrchestratorEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Get the event receiver for a dedicated consumer
    pub fn event_receiver(&self) -> Receiver<OrchestratorEvent> {
        self.event_rx.clone()
    }

    /// Latest session state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().clone()
    }
}

/// Main orchestrator that owns the session
pub struct Orchestrator {
    session: CookingSession,

    /// Command receiver
    command_rx: Receiver<OrchestratorCommand>,

    /// Event sender
    event_tx: Sender<OrchestratorEvent>,

    snapshot: Arc<RwLock<SessionSnapshot>>,
}

impl Orchestrator {
    /// Create a new orchestrator for `catalog`
    pub fn new(
        config: AssistantConfig,
        catalog: Catalog,
        preferences: Option<PreferenceStore>,
    ) -> Result<(Self, OrchestratorHandle)> {
        config.validate()?;

        let channels = SessionChannels::new(256);
        let mut session = CookingSession::new(config, catalog);
        if let Some(store) = preferences {
            session = session.with_preference_store(store);
        }
        let snapshot = Arc::new(RwLock::new(session.snapshot()));

        let handle = OrchestratorHandle {
            command_tx: channels.command_tx,
            event_rx: channels.event_rx,
            snapshot: Arc::clone(&snapshot),
        };

        let orchestrator = Self {
            session,
            command_rx: channels.command_rx,
            event_tx: channels.event_tx,
            snapshot,
        };

        Ok((orchestrator, handle))
    }

    /// Start the session loop on a worker thread
    ///
    /// This consumes the orchestrator and returns the join handle.
    pub fn start(self) -> Result<JoinHandle<()>> {
        let Self {
            mut session,
            command_rx,
            event_tx,
            snapshot,
        } = self;

        thread::Builder::new()
            .name("cookease-session".to_string())
            .spawn(move || {
                info!("Orchestrator started");
                let epoch = Instant::now();
                let clock = || epoch.elapsed().as_millis() as u64;

                session.start();

                loop {
                    session.advance_to(clock());
                    if !forward_effects(&mut session, &event_tx) {
                        warn!("Event channel disconnected");
                        break;
                    }
                    *snapshot.write() = session.snapshot();

                    let received = match session.next_deadline() {
                        Some(due) => command_rx.recv_deadline(epoch + Duration::from_millis(due)),
                        None => command_rx
                            .recv()
                            .map_err(|_| RecvTimeoutError::Disconnected),
                    };

                    match received {
                        Ok(OrchestratorCommand::Session(cmd)) => {
                            debug!("Session command: {:?}", cmd);
                            session.handle(clock(), cmd);
                        }
                        Ok(OrchestratorCommand::Shutdown) => {
                            info!("Orchestrator shutdown requested");
                            forward_effects(&mut session, &event_tx);
                            let _ = event_tx.send(OrchestratorEvent::Shutdown);
                            break;
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => {
                            warn!("Command channel disconnected");
                            break;
                        }
                    }
                }

                info!("Orchestrator stopped");
            })
            .map_err(|e| CookeaseError::SessionError(format!("Failed to spawn session thread: {}", e)))
    }
}

/// Returns false once nobody is listening
fn forward_effects(session: &mut CookingSession, event_tx: &Sender<OrchestratorEvent>) -> bool {
    session
        .drain_effects()
        .into_iter()
        .all(|effect| event_tx.send(OrchestratorEvent::Effect(effect)).is_ok())
}

/// Builder for creating an orchestrator
pub struct OrchestratorBuilder {
    config: AssistantConfig,
    catalog: Catalog,
    preferences: Option<PreferenceStore>,
}

impl OrchestratorBuilder {
    /// Create a new builder with default configuration and no recipes
    pub fn new() -> Self {
        Self {
            config: AssistantConfig::default(),
            catalog: Catalog::default(),
            preferences: None,
        }
    }

    /// Set the complete configuration
    pub fn with_config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Persist guide preferences through `store`
    pub fn with_preferences(mut self, store: PreferenceStore) -> Self {
        self.preferences = Some(store);
        self
    }

    /// Disable voice input
    pub fn without_voice_input(mut self) -> Self {
        self.config.enable_voice_input = false;
        self
    }

    /// Build the orchestrator
    pub fn build(self) -> Result<(Orchestrator, OrchestratorHandle)> {
        Orchestrator::new(self.config, self.catalog, self.preferences)
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
