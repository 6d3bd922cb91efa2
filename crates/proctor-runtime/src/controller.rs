//! Interview controller: reacts to manager decisions.
//!
//! Streams every decision as a JSON line, tracks the warning banner the UI
//! would show, and builds the termination record once the session ends.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::{
    ManagerEvent, Termination, ViolationCounts, ViolationKind, ViolationSink, Warning, messages,
};

/// Persisted when a session is terminated for repeated violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminationRecord {
    pub reason: ViolationKind,
    pub final_count: u32,
    pub message: String,
    pub counts: ViolationCounts,
    pub terminated_at: DateTime<Utc>,
}

pub struct InterviewController<W: Write> {
    out: W,
    banner: Option<Warning>,
    termination: Option<TerminationRecord>,
    write_error: Option<io::Error>,
}

impl<W: Write> InterviewController<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            banner: None,
            termination: None,
            write_error: None,
        }
    }

    /// Warning currently on screen, cleared on resume.
    pub fn banner(&self) -> Option<&Warning> {
        self.banner.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.termination.is_some()
    }

    pub fn termination(&self) -> Option<&TerminationRecord> {
        self.termination.as_ref()
    }

    /// Fill in final counts once the manager has settled.
    pub fn finalize_counts(&mut self, counts: ViolationCounts) {
        if let Some(record) = self.termination.as_mut() {
            record.counts = counts;
        }
    }

    /// Surface the first write failure, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &ManagerEvent) {
        if self.write_error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.out, event)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::error!("failed to write event: {e}");
            self.write_error = Some(e);
        }
    }
}

impl<W: Write> ViolationSink for InterviewController<W> {
    fn on_warning(&mut self, warning: &Warning, message: &str) {
        self.banner = Some(*warning);
        self.emit(&ManagerEvent::Warning {
            kind: warning.kind,
            count: warning.count,
            message: message.to_string(),
        });
    }

    fn on_resume(&mut self) {
        self.banner = None;
        self.emit(&ManagerEvent::Resume {
            message: messages::resume_message().to_string(),
        });
    }

    fn on_terminate(&mut self, termination: &Termination, message: &str) {
        let mut counts = ViolationCounts::default();
        match termination.kind {
            ViolationKind::Phone => counts.phone = termination.count,
            ViolationKind::MultiplePeople => counts.multiple_people = termination.count,
        }
        self.termination = Some(TerminationRecord {
            reason: termination.kind,
            final_count: termination.count,
            message: message.to_string(),
            counts,
            terminated_at: Utc::now(),
        });
        self.emit(&ManagerEvent::Terminate {
            kind: termination.kind,
            count: termination.count,
            message: message.to_string(),
        });
    }
}

/// Write the termination record as pretty JSON.
pub fn write_record(path: &Path, record: &TerminationRecord) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("termination record written to {}", path.display());
    Ok(())
}
