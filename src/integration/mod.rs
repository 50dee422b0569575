//! Integration layer
//!
//! The cooking session, the thread that drives it, and their configuration.

pub mod config;
pub mod orchestrator;
pub mod session;

pub use config::AssistantConfig;
pub use orchestrator::{
    Orchestrator, OrchestratorBuilder, OrchestratorCommand, OrchestratorEvent, OrchestratorHandle,
};
pub use session::{CookingSession, Effect, SessionCommand, SessionSnapshot, SessionTask};
