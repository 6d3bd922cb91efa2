//! Manager configuration.

use serde::{Deserialize, Serialize};

use crate::error::ProctorError;

/// Default pause window after a warning (milliseconds).
pub const DEFAULT_PAUSE_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerConfig {
    /// Pause window length, also used as the per-kind cooldown.
    pub pause_ms: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

impl ManagerConfig {
    pub fn with_pause_ms(pause_ms: u64) -> Self {
        Self { pause_ms }
    }

    /// Reject configurations that would disable debouncing entirely.
    pub fn validate(&self) -> Result<(), ProctorError> {
        if self.pause_ms == 0 {
            return Err(ProctorError::InvalidConfig(
                "pause_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pause_is_five_seconds() {
        assert_eq!(ManagerConfig::default().pause_ms, 5000);
    }

    #[test]
    fn zero_pause_rejected() {
        let err = ManagerConfig::with_pause_ms(0)
            .validate()
            .expect_err("zero pause must fail");
        assert!(matches!(err, ProctorError::InvalidConfig(_)));
    }

    #[test]
    fn missing_fields_fall_back_to_default() {
        let cfg: ManagerConfig = serde_json::from_str("{}").expect("valid json");
        assert_eq!(cfg, ManagerConfig::default());

        let cfg: ManagerConfig = serde_json::from_str(r#"{"pauseMs": 2500}"#).expect("valid json");
        assert_eq!(cfg.pause_ms, 2500);
    }
}
