use serde::Deserialize;
use validator::Validate;

use crate::domain::types::VolunteerId;
use crate::domain::volunteer::VolunteerAction;
use crate::forms::{FormError, is_checked};

#[derive(Debug, Deserialize, Validate)]
/// Form posted by the action buttons of the volunteer table.
pub struct VolunteerActionForm {
    #[validate(length(min = 1))]
    pub action: String,
    #[validate(range(min = 1))]
    pub volunteer_id: i32,
    /// Checkbox that must be ticked for permanent actions.
    #[serde(default)]
    pub confirm_permanent: Option<String>,
}

/// Validated volunteer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolunteerActionPayload {
    pub volunteer_id: VolunteerId,
    pub action: VolunteerAction,
}

impl TryFrom<VolunteerActionForm> for VolunteerActionPayload {
    type Error = FormError;

    fn try_from(form: VolunteerActionForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let action = VolunteerAction::parse(&form.action)
            .ok_or_else(|| FormError::UnknownAction(form.action.clone()))?;
        let volunteer_id =
            VolunteerId::new(form.volunteer_id).map_err(|_| FormError::InvalidId)?;

        if action.is_permanent() && !is_checked(form.confirm_permanent.as_deref()) {
            return Err(FormError::ConfirmationRequired);
        }

        Ok(Self {
            volunteer_id,
            action,
        })
    }
}
