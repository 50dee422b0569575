use crate::integration::orchestrator::{OrchestratorCommand, OrchestratorEvent};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

/// Command and event channels between the front-end and the session thread
///
/// Commands are bounded. Events are unbounded so the session thread never
/// blocks on a slow consumer while that consumer waits to send a command.
pub struct SessionChannels {
    pub command_tx: Sender<OrchestratorCommand>,
    pub command_rx: Receiver<OrchestratorCommand>,
    pub event_tx: Sender<OrchestratorEvent>,
    pub event_rx: Receiver<OrchestratorEvent>,
}

impl SessionChannels {
    pub fn new(command_buffer: usize) -> Self {
        let (command_tx, command_rx) = bounded(command_buffer);
        let (event_tx, event_rx) = unbounded();

        Self {
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }
}

impl Default for SessionChannels {
    fn default() -> Self {
        Self::new(100)
    }
}
