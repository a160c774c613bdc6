use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::filter::StatusEnum;
use crate::domain::transition::{Transition, TransitionError};
use crate::domain::types::{UserId, VolunteerId};

/// Lifecycle status stored in `volunteers.volunteer_status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolunteerStatus {
    New,
    Active,
    Inactive,
    /// Reached only through the scheduling flow.
    OnLeave,
}

impl StatusEnum for VolunteerStatus {
    const ENTITY: &'static str = "volunteer";
    const ALL: &'static [Self] = &[
        VolunteerStatus::New,
        VolunteerStatus::Active,
        VolunteerStatus::Inactive,
        VolunteerStatus::OnLeave,
    ];

    fn as_str(self) -> &'static str {
        match self {
            VolunteerStatus::New => "New Volunteer",
            VolunteerStatus::Active => "Active",
            VolunteerStatus::Inactive => "Inactive",
            VolunteerStatus::OnLeave => "On Leave",
        }
    }
}

impl Display for VolunteerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Administrative actions available on the volunteer management page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolunteerAction {
    Approve,
    Reject,
    Deactivate,
    /// Permanent removal with cascade; never reversible.
    Delete,
}

impl VolunteerAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "approve" => Some(VolunteerAction::Approve),
            "reject" => Some(VolunteerAction::Reject),
            "deactivate" => Some(VolunteerAction::Deactivate),
            "delete" => Some(VolunteerAction::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VolunteerAction::Approve => "approve",
            VolunteerAction::Reject => "reject",
            VolunteerAction::Deactivate => "deactivate",
            VolunteerAction::Delete => "delete",
        }
    }

    /// Whether the action destroys data and needs an explicit confirmation.
    pub fn is_permanent(self) -> bool {
        matches!(self, VolunteerAction::Delete)
    }
}

impl VolunteerStatus {
    /// Applies a status-changing action. `Delete` is not a status change and is rejected here.
    pub fn apply(self, action: VolunteerAction) -> Result<Transition<Self>, TransitionError> {
        use VolunteerStatus::*;

        let target = match (action, self) {
            (VolunteerAction::Approve, New) => Active,
            (VolunteerAction::Reject, New) => Inactive,
            (VolunteerAction::Deactivate, Inactive) => return Ok(Transition::Unchanged(Inactive)),
            (VolunteerAction::Deactivate, New | Active | OnLeave) => Inactive,
            (action, from) => return Err(TransitionError::new(action.as_str(), from)),
        };

        Ok(Transition::Changed {
            from: self,
            to: target,
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub status: VolunteerStatus,
    pub application_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// What a permanent volunteer removal touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub removed_assignments: usize,
    pub deactivated_accounts: usize,
}
