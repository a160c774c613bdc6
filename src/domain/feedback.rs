use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::filter::{FilterError, StatusEnum};
use crate::domain::transition::{Transition, TransitionError};
use crate::domain::types::FeedbackId;

/// Moderation status stored in `feedbacks.status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackStatus {
    Pending,
    Approved,
    Rejected,
}

impl StatusEnum for FeedbackStatus {
    const ENTITY: &'static str = "feedback";
    const ALL: &'static [Self] = &[
        FeedbackStatus::Pending,
        FeedbackStatus::Approved,
        FeedbackStatus::Rejected,
    ];

    fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Approved => "approved",
            FeedbackStatus::Rejected => "rejected",
        }
    }
}

impl Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackAction {
    Approve,
    Reject,
    Delete,
}

impl FeedbackAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "approve" => Some(FeedbackAction::Approve),
            "reject" => Some(FeedbackAction::Reject),
            "delete" => Some(FeedbackAction::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackAction::Approve => "approve",
            FeedbackAction::Reject => "reject",
            FeedbackAction::Delete => "delete",
        }
    }

    pub fn is_permanent(self) -> bool {
        matches!(self, FeedbackAction::Delete)
    }
}

impl FeedbackStatus {
    /// Moderation moves are reversible; re-applying the current decision is a no-op.
    pub fn apply(self, action: FeedbackAction) -> Result<Transition<Self>, TransitionError> {
        let target = match action {
            FeedbackAction::Approve => FeedbackStatus::Approved,
            FeedbackAction::Reject => FeedbackStatus::Rejected,
            FeedbackAction::Delete => return Err(TransitionError::new(action.as_str(), self)),
        };

        if target == self {
            Ok(Transition::Unchanged(self))
        } else {
            Ok(Transition::Changed {
                from: self,
                to: target,
            })
        }
    }
}

/// Anonymity predicate of the feedback list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    All,
    Anonymous,
    Named,
}

impl Visibility {
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(Visibility::All),
            Some("anonymous") => Ok(Visibility::Anonymous),
            Some("named") => Ok(Visibility::Named),
            Some(value) => Err(FilterError::UnknownValue {
                field: "visibility",
                value: value.to_string(),
            }),
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            Visibility::All => "all",
            Visibility::Anonymous => "anonymous",
            Visibility::Named => "named",
        }
    }

    /// Value of `is_anonymous` to match, if any.
    pub fn anonymous_flag(self) -> Option<bool> {
        match self {
            Visibility::All => None,
            Visibility::Anonymous => Some(true),
            Visibility::Named => Some(false),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    pub rating: i32,
    pub is_anonymous: bool,
    pub status: FeedbackStatus,
    pub created_at: NaiveDateTime,
}

/// Aggregates shown above the moderation table.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct FeedbackStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub anonymous: usize,
    pub average_rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_and_reject_flip_status() {
        let approved = FeedbackStatus::Pending
            .apply(FeedbackAction::Approve)
            .unwrap();
        assert_eq!(approved.target(), FeedbackStatus::Approved);

        let rejected = approved.target().apply(FeedbackAction::Reject).unwrap();
        assert_eq!(
            rejected,
            Transition::Changed {
                from: FeedbackStatus::Approved,
                to: FeedbackStatus::Rejected
            }
        );
    }

    #[test]
    fn repeating_a_decision_is_a_no_op() {
        assert_eq!(
            FeedbackStatus::Approved.apply(FeedbackAction::Approve),
            Ok(Transition::Unchanged(FeedbackStatus::Approved))
        );
    }

    #[test]
    fn visibility_parses_known_values_only() {
        assert_eq!(Visibility::parse(None), Ok(Visibility::All));
        assert_eq!(
            Visibility::parse(Some("anonymous")).map(Visibility::anonymous_flag),
            Ok(Some(true))
        );
        assert_eq!(
            Visibility::parse(Some("named")).map(Visibility::anonymous_flag),
            Ok(Some(false))
        );
        assert!(Visibility::parse(Some("secret")).is_err());
    }
}
