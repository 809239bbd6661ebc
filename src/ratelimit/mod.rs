//! Per-client admission control and state management.

mod counter;
mod identity;
mod limiter;
mod sweeper;

pub use counter::{ClientWindowState, Decision, WindowConfig};
pub use identity::ClientId;
pub use limiter::AdmissionLimiter;
pub use sweeper::spawn_sweeper;
