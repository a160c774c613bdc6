//! Diesel models for incidents and their status audit log.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Nullable, Text};

use crate::domain::filter::StatusEnum;
use crate::domain::incident::{
    Incident as DomainIncident, IncidentStatus, IncidentStatusChange, Severity,
};
use crate::domain::types::{IncidentId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::incidents)]
pub struct Incident {
    pub id: i32,
    pub external_id: Option<String>,
    pub title: String,
    pub location: String,
    pub description: String,
    pub emergency_type: String,
    pub severity: String,
    pub status: String,
    pub caller_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
}

/// Raw list row used by the incident table.
#[derive(Debug, Clone, QueryableByName, PartialEq)]
pub struct IncidentRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Nullable<Text>)]
    pub external_id: Option<String>,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub location: String,
    #[diesel(sql_type = Text)]
    pub emergency_type: String,
    #[diesel(sql_type = Text)]
    pub severity: String,
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub caller_name: Option<String>,
    #[diesel(sql_type = Text)]
    pub created_at: String,
}

impl IncidentRow {
    pub const COLUMNS: &'static str = "id, external_id, title, location, emergency_type, \
        severity, status, caller_name, created_at";
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::incident_status_logs)]
pub struct NewIncidentStatusLog<'a> {
    pub incident_id: i32,
    pub old_status: &'a str,
    pub new_status: &'a str,
    pub changed_by: i32,
    pub change_notes: Option<&'a str>,
}

impl<'a> From<&'a IncidentStatusChange> for NewIncidentStatusLog<'a> {
    fn from(change: &'a IncidentStatusChange) -> Self {
        Self {
            incident_id: change.incident_id.get(),
            old_status: change.from.as_str(),
            new_status: change.to.as_str(),
            changed_by: change.changed_by.get(),
            change_notes: change.notes.as_deref(),
        }
    }
}

impl TryFrom<Incident> for DomainIncident {
    type Error = TypeConstraintError;

    fn try_from(incident: Incident) -> Result<Self, Self::Error> {
        let status = IncidentStatus::parse(&incident.status).ok_or_else(|| {
            TypeConstraintError::InvalidValue(format!("incident status '{}'", incident.status))
        })?;
        let severity = Severity::parse(&incident.severity).ok_or_else(|| {
            TypeConstraintError::InvalidValue(format!("incident severity '{}'", incident.severity))
        })?;

        Ok(Self {
            id: IncidentId::new(incident.id)?,
            external_id: incident.external_id,
            title: incident.title,
            location: incident.location,
            description: incident.description,
            emergency_type: incident.emergency_type,
            severity,
            status,
            caller_name: incident.caller_name,
            created_at: incident.created_at,
            responded_at: incident.responded_at,
        })
    }
}
