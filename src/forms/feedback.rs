use serde::Deserialize;
use validator::Validate;

use crate::domain::feedback::FeedbackAction;
use crate::domain::types::FeedbackId;
use crate::forms::{FormError, is_checked};

#[derive(Debug, Deserialize, Validate)]
/// Form posted by the moderation buttons of the feedback table.
pub struct FeedbackActionForm {
    #[validate(length(min = 1))]
    pub action: String,
    #[validate(range(min = 1))]
    pub feedback_id: i32,
    #[serde(default)]
    pub confirm_permanent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackActionPayload {
    pub feedback_id: FeedbackId,
    pub action: FeedbackAction,
}

impl TryFrom<FeedbackActionForm> for FeedbackActionPayload {
    type Error = FormError;

    fn try_from(form: FeedbackActionForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let action = FeedbackAction::parse(&form.action)
            .ok_or_else(|| FormError::UnknownAction(form.action.clone()))?;
        let feedback_id = FeedbackId::new(form.feedback_id).map_err(|_| FormError::InvalidId)?;

        if action.is_permanent() && !is_checked(form.confirm_permanent.as_deref()) {
            return Err(FormError::ConfirmationRequired);
        }

        Ok(Self {
            feedback_id,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::parse_form;

    #[test]
    fn approve_is_parsed() {
        let form: FeedbackActionForm =
            parse_form(b"action=approve&feedback_id=3").expect("parses");
        let payload = FeedbackActionPayload::try_from(form).expect("valid");
        assert_eq!(payload.action, FeedbackAction::Approve);
        assert_eq!(payload.feedback_id.get(), 3);
    }

    #[test]
    fn delete_requires_confirmation() {
        let form: FeedbackActionForm =
            parse_form(b"action=delete&feedback_id=3&confirm_permanent=off").expect("parses");
        assert!(matches!(
            FeedbackActionPayload::try_from(form),
            Err(FormError::ConfirmationRequired)
        ));
    }
}
