use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::filter::{FilterError, StatusEnum};
use crate::domain::transition::{Transition, TransitionError};
use crate::domain::types::{IncidentId, StatusNote, UserId};

/// Handling status stored in `incidents.status`, ordered by progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncidentStatus {
    Pending,
    Processing,
    Responded,
    Closed,
}

impl StatusEnum for IncidentStatus {
    const ENTITY: &'static str = "incident";
    const ALL: &'static [Self] = &[
        IncidentStatus::Pending,
        IncidentStatus::Processing,
        IncidentStatus::Responded,
        IncidentStatus::Closed,
    ];

    fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pending",
            IncidentStatus::Processing => "processing",
            IncidentStatus::Responded => "responded",
            IncidentStatus::Closed => "closed",
        }
    }
}

impl Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl IncidentStatus {
    /// Forward-only move; skipping stages is allowed, going back is not.
    pub fn advance_to(self, target: Self) -> Result<Transition<Self>, TransitionError> {
        if target == self {
            Ok(Transition::Unchanged(self))
        } else if target > self {
            Ok(Transition::Changed {
                from: self,
                to: target,
            })
        } else {
            Err(TransitionError::new("move back", self))
        }
    }
}

/// Severity stored in `incidents.severity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: &'static [Severity] = &[
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == raw)
    }

    /// Parses the `severity` request parameter; missing, blank and `all` mean no predicate.
    pub fn parse_filter(raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(value) => {
                Self::parse(value)
                    .map(Some)
                    .ok_or_else(|| FilterError::UnknownValue {
                        field: "severity",
                        value: value.to_string(),
                    })
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Incident {
    pub id: IncidentId,
    pub external_id: Option<String>,
    pub title: String,
    pub location: String,
    pub description: String,
    pub emergency_type: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub caller_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
}

/// A status change to persist together with its audit log row.
#[derive(Clone, Debug, PartialEq)]
pub struct IncidentStatusChange {
    pub incident_id: IncidentId,
    pub from: IncidentStatus,
    pub to: IncidentStatus,
    pub changed_by: UserId,
    pub notes: Option<StatusNote>,
}
