use serde::Deserialize;
use validator::Validate;

use crate::domain::filter::StatusEnum;
use crate::domain::incident::IncidentStatus;
use crate::domain::types::{IncidentId, StatusNote};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form posted by the status selector of the incident table.
pub struct IncidentStatusForm {
    #[validate(range(min = 1))]
    pub incident_id: i32,
    #[validate(length(min = 1))]
    pub status: String,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentStatusPayload {
    pub incident_id: IncidentId,
    pub status: IncidentStatus,
    pub notes: Option<StatusNote>,
}

impl TryFrom<IncidentStatusForm> for IncidentStatusPayload {
    type Error = FormError;

    fn try_from(form: IncidentStatusForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = IncidentStatus::parse(form.status.trim())
            .ok_or_else(|| FormError::UnknownStatus(form.status.clone()))?;
        let incident_id = IncidentId::new(form.incident_id).map_err(|_| FormError::InvalidId)?;
        // Blank notes are dropped rather than stored as empty strings.
        let notes = form.notes.and_then(|note| StatusNote::new(note).ok());

        Ok(Self {
            incident_id,
            status,
            notes,
        })
    }
}
