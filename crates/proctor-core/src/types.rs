//! Data model shared by the manager and its callers: violation kinds,
//! per-tick detection snapshots, counts, and the decisions the manager emits.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::messages;

// ─── Violation Kind ───────────────────────────────────────────────

/// The two independently counted violation tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    Phone,
    MultiplePeople,
}

impl ViolationKind {
    pub const ALL: [Self; 2] = [Self::Phone, Self::MultiplePeople];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::MultiplePeople => "multiplePeople",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Snapshot ─────────────────────────────────────────────────────

/// One perception tick worth of detection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSnapshot {
    /// Monotonic timestamp in milliseconds.
    pub now: u64,
    pub is_interview_started: bool,
    #[serde(default)]
    pub phone_detected: bool,
    /// Negative counts from a misbehaving source are clamped to zero.
    #[serde(default, deserialize_with = "clamp_count")]
    pub people_count: u32,
}

impl DetectionSnapshot {
    /// Whether this snapshot carries any violation at all.
    pub fn is_violating(&self) -> bool {
        self.phone_detected || self.people_count > 1
    }
}

fn clamp_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, i64::from(u32::MAX)) as u32)
}

// ─── Counts ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationCounts {
    pub phone: u32,
    pub multiple_people: u32,
}

impl ViolationCounts {
    pub fn get(&self, kind: ViolationKind) -> u32 {
        match kind {
            ViolationKind::Phone => self.phone,
            ViolationKind::MultiplePeople => self.multiple_people,
        }
    }
}

// ─── Decisions ────────────────────────────────────────────────────

/// A warning decision: which track fired and its updated count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: ViolationKind,
    pub count: u32,
}

impl Warning {
    pub fn message(&self) -> String {
        messages::warning_message(self.kind, self.count)
    }
}

/// A termination decision, issued right after the final warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    pub kind: ViolationKind,
    pub count: u32,
}

impl Termination {
    pub fn message(&self) -> String {
        messages::termination_message(self.kind).to_string()
    }
}

/// Flattened manager output, as recorded or streamed to a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ManagerEvent {
    Warning {
        kind: ViolationKind,
        count: u32,
        message: String,
    },
    Resume {
        message: String,
    },
    Terminate {
        kind: ViolationKind,
        count: u32,
        message: String,
    },
}

impl ManagerEvent {
    pub fn is_terminate(&self) -> bool {
        matches!(self, Self::Terminate { .. })
    }
}
