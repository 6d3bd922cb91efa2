//! User-facing text for manager decisions.
//!
//! Kept apart from the state machine so controllers can localize or replace
//! it without touching escalation logic.

use crate::manager::MAX_WARNINGS;
use crate::types::ViolationKind;

/// Warning banner text, e.g. `"Warning 2 of 3: ..."`.
pub fn warning_message(kind: ViolationKind, count: u32) -> String {
    let detail = match kind {
        ViolationKind::Phone => "Mobile phone detected. Please put your phone away.",
        ViolationKind::MultiplePeople => {
            "Multiple people detected. Only the candidate may be present."
        }
    };
    format!(
        "\u{26a0}\u{fe0f} Warning {count} of {MAX_WARNINGS}: {detail} \
         The interview will be terminated after {MAX_WARNINGS} warnings."
    )
}

pub fn termination_message(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::Phone => {
            "\u{1f6ab} Interview terminated: a mobile phone was detected repeatedly."
        }
        ViolationKind::MultiplePeople => {
            "\u{1f6ab} Interview terminated: multiple people were detected repeatedly."
        }
    }
}

pub fn resume_message() -> &'static str {
    "Detection resumed. Please continue with the interview."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_embeds_count_and_ceiling() {
        let msg = warning_message(ViolationKind::Phone, 2);
        assert!(msg.contains("Warning 2 of 3"));
        assert!(msg.contains("phone"));
    }

    #[test]
    fn messages_differ_per_kind() {
        assert_ne!(
            warning_message(ViolationKind::Phone, 1),
            warning_message(ViolationKind::MultiplePeople, 1)
        );
        assert_ne!(
            termination_message(ViolationKind::Phone),
            termination_message(ViolationKind::MultiplePeople)
        );
    }
}
