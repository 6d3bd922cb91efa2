//! proctor-core: violation detection and warning escalation for proctored
//! interviews.
//!
//! Pure state machine with no IO, async, or clock reads. Callers supply
//! timestamps on every call, so any input sequence replays deterministically.

pub mod config;
pub mod error;
pub mod manager;
pub mod messages;
pub mod perception;
pub mod types;

pub use config::{DEFAULT_PAUSE_MS, ManagerConfig};
pub use error::ProctorError;
pub use manager::{DetectionManager, EventRecorder, MAX_WARNINGS, ViolationSink};
pub use types::{DetectionSnapshot, ManagerEvent, Termination, ViolationCounts, ViolationKind, Warning};
