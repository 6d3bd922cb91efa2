//! Violation detection manager: turns noisy per-frame detection snapshots
//! into debounced, counted warnings.
//!
//! - **Pause window**: after any warning, every snapshot is dropped until
//!   `now >= pause_until`. Only `tick` clears the window and fires `on_resume`.
//! - **Cooldown**: per-kind minimum spacing of `pause_ms` between warnings,
//!   checked independently of the pause window.
//! - **Priority**: a phone in the frame wins over a people-count violation
//!   in the same snapshot.
//! - **Duplicate second**: people warnings are keyed by
//!   `(people_count, now / 1000)` and fire at most once per key.
//! - **Escalation**: the [`MAX_WARNINGS`]th warning of either kind is
//!   followed immediately by a single `on_terminate`.
//!
//! One manager per interview session. Reusing a manager across sessions
//! without [`DetectionManager::reset`] carries violation counts over.
//! Calls must be serialized; the manager holds no locks.

use tracing::{debug, info, warn};

use crate::config::ManagerConfig;
use crate::messages;
use crate::types::{
    DetectionSnapshot, ManagerEvent, Termination, ViolationCounts, ViolationKind, Warning,
};

/// Warnings of one kind that end the interview.
pub const MAX_WARNINGS: u32 = 3;

/// Receiver for manager decisions. All methods default to no-ops.
pub trait ViolationSink {
    fn on_warning(&mut self, _warning: &Warning, _message: &str) {}
    fn on_resume(&mut self) {}
    fn on_terminate(&mut self, _termination: &Termination, _message: &str) {}
}

/// Sink that records every callback in order.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub events: Vec<ManagerEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<ManagerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ViolationSink for EventRecorder {
    fn on_warning(&mut self, warning: &Warning, message: &str) {
        self.events.push(ManagerEvent::Warning {
            kind: warning.kind,
            count: warning.count,
            message: message.to_string(),
        });
    }

    fn on_resume(&mut self) {
        self.events.push(ManagerEvent::Resume {
            message: messages::resume_message().to_string(),
        });
    }

    fn on_terminate(&mut self, termination: &Termination, message: &str) {
        self.events.push(ManagerEvent::Terminate {
            kind: termination.kind,
            count: termination.count,
            message: message.to_string(),
        });
    }
}

impl<S: ViolationSink + ?Sized> ViolationSink for &mut S {
    fn on_warning(&mut self, warning: &Warning, message: &str) {
        (**self).on_warning(warning, message);
    }

    fn on_resume(&mut self) {
        (**self).on_resume();
    }

    fn on_terminate(&mut self, termination: &Termination, message: &str) {
        (**self).on_terminate(termination, message);
    }
}

/// Mutable escalation state, reset wholesale between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ManagerState {
    phone_count: u32,
    people_count_warnings: u32,
    pause_until: Option<u64>,
    last_phone_warning: Option<u64>,
    last_people_warning: Option<u64>,
    /// `(people_count, second bucket)` of the last people warning.
    last_people_hash: Option<(u32, u64)>,
    terminated: bool,
}

pub struct DetectionManager<S: ViolationSink> {
    sink: S,
    config: ManagerConfig,
    state: ManagerState,
}

impl<S: ViolationSink> DetectionManager<S> {
    pub fn new(sink: S, config: ManagerConfig) -> Self {
        Self {
            sink,
            config,
            state: ManagerState::default(),
        }
    }

    /// Ingest one detection snapshot. Side effects go through the sink only.
    pub fn process(&mut self, snapshot: &DetectionSnapshot) {
        if !snapshot.is_interview_started {
            return;
        }
        let now = snapshot.now;

        if self.is_paused(now) {
            debug!(now, "snapshot dropped: pause window active");
            return;
        }

        if !snapshot.is_violating() {
            return;
        }

        if self.state.terminated {
            debug!(now, "snapshot dropped: session already terminated");
            return;
        }

        if snapshot.phone_detected {
            // Phone wins; the people track is not evaluated this snapshot.
            if self.cooldown_active(self.state.last_phone_warning, now) {
                debug!(now, "phone warning suppressed: cooldown");
                return;
            }
            self.state.phone_count += 1;
            self.state.last_phone_warning = Some(now);
            let count = self.state.phone_count;
            self.escalate(ViolationKind::Phone, count, now);
            return;
        }

        let hash = (snapshot.people_count, now / 1000);
        if self.state.last_people_hash == Some(hash) {
            debug!(now, people = snapshot.people_count, "people warning suppressed: same second");
            return;
        }
        if self.cooldown_active(self.state.last_people_warning, now) {
            debug!(now, "people warning suppressed: cooldown");
            return;
        }
        self.state.last_people_hash = Some(hash);
        self.state.people_count_warnings += 1;
        self.state.last_people_warning = Some(now);
        let count = self.state.people_count_warnings;
        self.escalate(ViolationKind::MultiplePeople, count, now);
    }

    /// Fire `on_resume` once the pause window has elapsed.
    pub fn tick(&mut self, now: u64) {
        match self.state.pause_until {
            Some(until) if now >= until => {
                self.state.pause_until = None;
                info!(now, "pause window elapsed, detection resumed");
                self.sink.on_resume();
            }
            _ => {}
        }
    }

    /// Clear counters, timestamps, and the pause window. No callbacks fire.
    pub fn reset(&mut self) {
        self.state = ManagerState::default();
    }

    pub fn get_counts(&self) -> ViolationCounts {
        ViolationCounts {
            phone: self.state.phone_count,
            multiple_people: self.state.people_count_warnings,
        }
    }

    pub fn is_paused(&self, now: u64) -> bool {
        self.state.pause_until.is_some_and(|until| now < until)
    }

    /// Whether the pause window is still set, i.e. `tick` has not yet
    /// observed its expiry.
    pub fn has_pending_resume(&self) -> bool {
        self.state.pause_until.is_some()
    }

    pub fn is_terminated(&self) -> bool {
        self.state.terminated
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// `now` earlier than the last warning counts as still cooling down.
    fn cooldown_active(&self, last: Option<u64>, now: u64) -> bool {
        match last {
            Some(last) => now < last || now - last < self.config.pause_ms,
            None => false,
        }
    }

    fn escalate(&mut self, kind: ViolationKind, count: u32, now: u64) {
        let warning = Warning { kind, count };
        let message = warning.message();
        info!(%kind, count, now, "violation warning issued");
        self.sink.on_warning(&warning, &message);

        self.state.pause_until = Some(now.saturating_add(self.config.pause_ms));

        if count >= MAX_WARNINGS {
            self.state.terminated = true;
            let termination = Termination { kind, count };
            let message = termination.message();
            warn!(%kind, count, now, "warning limit reached, terminating interview");
            self.sink.on_terminate(&termination, &message);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
