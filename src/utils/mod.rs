pub mod channels;
pub mod scheduler;

pub use channels::SessionChannels;
pub use scheduler::{Scheduler, TaskId};
