//! Selector lifecycle.
//!
//! ```text
//! Ready ──► Scoring ──► Ranking ──► Pruned
//! ```
//! Transitions are one-way; `Pruned` is terminal.

use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one selection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorState {
    /// Constructed, nothing scored yet
    Ready,
    /// Running scoring methods over the surviving columns
    Scoring,
    /// Normalizing, combining and sorting scores
    Ranking,
    /// Top-N selected (terminal)
    Pruned,
}

impl SelectorState {
    /// Returns the allowed transitions from the current state.
    #[must_use]
    pub fn allowed_transitions(&self) -> &[SelectorState] {
        match self {
            SelectorState::Ready => &[SelectorState::Scoring],
            SelectorState::Scoring => &[SelectorState::Ranking],
            SelectorState::Ranking => &[SelectorState::Pruned],
            SelectorState::Pruned => &[],
        }
    }

    /// Checks if this is the terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, SelectorState::Pruned)
    }

    /// Checks if a transition to the target state is valid.
    #[must_use]
    pub fn can_transition_to(&self, target: SelectorState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Moves to `target`.
    ///
    /// # Errors
    /// Returns [`SelectionError::InvalidTransition`] for a transition not in
    /// [`allowed_transitions`](Self::allowed_transitions).
    pub fn transition(self, target: SelectorState) -> Result<SelectorState, SelectionError> {
        if self.can_transition_to(target) {
            tracing::debug!(from = %self, to = %target, "selector state change");
            Ok(target)
        } else {
            Err(SelectionError::InvalidTransition {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for SelectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorState::Ready => write!(f, "Ready"),
            SelectorState::Scoring => write!(f, "Scoring"),
            SelectorState::Ranking => write!(f, "Ranking"),
            SelectorState::Pruned => write!(f, "Pruned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let state = SelectorState::Ready
            .transition(SelectorState::Scoring)
            .and_then(|s| s.transition(SelectorState::Ranking))
            .and_then(|s| s.transition(SelectorState::Pruned))
            .unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn test_skipping_a_state_is_rejected() {
        let err = SelectorState::Ready
            .transition(SelectorState::Pruned)
            .unwrap_err();
        assert!(matches!(
            err,
            SelectionError::InvalidTransition {
                from: SelectorState::Ready,
                to: SelectorState::Pruned
            }
        ));
        assert_eq!(err.to_string(), "invalid selector transition: Ready -> Pruned");
    }

    #[test]
    fn test_pruned_is_terminal() {
        assert!(SelectorState::Pruned.allowed_transitions().is_empty());
        assert!(!SelectorState::Pruned.can_transition_to(SelectorState::Ready));
    }
}
