//! Pool connector state machine

use crate::{Error, Result};

/// Outcome state of one pool connect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    /// Attempt not yet resolved
    Pending,

    /// Pool established
    Ok,

    /// Attempt failed
    Failed,
}

impl ConnectorState {
    /// Check if transition is valid
    pub fn can_transition_to(&self, next: ConnectorState) -> bool {
        use ConnectorState::*;

        matches!((self, next), (Pending, Ok) | (Pending, Failed))
    }

    /// Transition to new state
    pub fn transition(&mut self, next: ConnectorState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(Error::InvalidState {
                expected: format!("valid transition from {}", self),
                actual: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl std::fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Ok => write!(f, "ok"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
