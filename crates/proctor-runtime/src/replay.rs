//! `proctor replay`: deterministic replay of recorded snapshots.
//!
//! Input is one JSON record per line:
//!
//! ```text
//! {"type":"snapshot","now":1200,"isInterviewStarted":true,"phoneDetected":true,"peopleCount":1}
//! {"type":"tick","now":6200}
//! {"type":"reset"}
//! ```
//!
//! Each snapshot is preceded by an implicit `tick(now)` so pause windows close
//! without explicit tick records.

use std::io::{BufRead, Write};

use serde::Deserialize;

use proctor_core::{DetectionManager, DetectionSnapshot, ManagerConfig, ViolationCounts};

use crate::controller::{InterviewController, TerminationRecord};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputRecord {
    Snapshot(DetectionSnapshot),
    Tick { now: u64 },
    Reset,
}

#[derive(Debug)]
pub struct ReplaySummary {
    pub counts: ViolationCounts,
    pub termination: Option<TerminationRecord>,
    pub records: usize,
    pub skipped: usize,
}

pub fn run_replay<R: BufRead, W: Write>(
    reader: R,
    out: W,
    config: ManagerConfig,
) -> anyhow::Result<ReplaySummary> {
    config.validate()?;
    let mut manager = DetectionManager::new(InterviewController::new(out), config);
    let mut records = 0;
    let mut skipped = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record: InputRecord = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("skipping line {}: {e}", idx + 1);
                skipped += 1;
                continue;
            }
        };
        records += 1;

        match record {
            InputRecord::Snapshot(snapshot) => {
                manager.tick(snapshot.now);
                manager.process(&snapshot);
            }
            InputRecord::Tick { now } => manager.tick(now),
            InputRecord::Reset => {
                tracing::info!("session reset at line {}", idx + 1);
                manager.reset();
            }
        }

        if let Some(e) = manager.sink_mut().take_error() {
            return Err(e.into());
        }
        if manager.sink().is_ended() {
            tracing::info!("interview terminated at line {}, stopping replay", idx + 1);
            break;
        }
    }

    let counts = manager.get_counts();
    let mut controller = manager.into_sink();
    controller.finalize_counts(counts);

    Ok(ReplaySummary {
        counts,
        termination: controller.termination().cloned(),
        records,
        skipped,
    })
}
