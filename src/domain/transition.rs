//! Outcome and error types shared by every status state machine.

use thiserror::Error;

use crate::domain::filter::StatusEnum;

/// Result of applying an administrative action to a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition<S> {
    /// The status moves and must be persisted.
    Changed { from: S, to: S },
    /// The record already is in the target status; nothing to write.
    Unchanged(S),
}

impl<S: StatusEnum> Transition<S> {
    /// Status after the action.
    pub fn target(&self) -> S {
        match self {
            Transition::Changed { to, .. } => *to,
            Transition::Unchanged(status) => *status,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

/// Action not permitted from the record's current status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} a {entity} in status '{from}'")]
pub struct TransitionError {
    pub entity: &'static str,
    pub action: &'static str,
    pub from: &'static str,
}

impl TransitionError {
    pub fn new<S: StatusEnum>(action: &'static str, from: S) -> Self {
        Self {
            entity: S::ENTITY,
            action,
            from: from.as_str(),
        }
    }
}
