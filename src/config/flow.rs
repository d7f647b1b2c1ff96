//! Conversation flow configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Conversation flow tunables
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// Days in the past a check-in may still start
    #[serde(default = "default_grace_days")]
    pub date_grace_days: u64,

    /// History entries offered by /history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl FlowConfig {
    /// Validate flow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_limit == 0 {
            return Err(ValidationError::InvalidHistoryLimit);
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            date_grace_days: default_grace_days(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_grace_days() -> u64 {
    1
}

fn default_history_limit() -> usize {
    crate::ports::DEFAULT_HISTORY_LIMIT
}
