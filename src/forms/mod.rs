//! Form definitions backing the admin routes.

use serde::Deserialize;
use thiserror::Error;
use validator::ValidationErrors;

pub mod feedback;
pub mod incidents;
pub mod volunteers;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed form body: {0}")]
    Malformed(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("invalid record id")]
    InvalidId,

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("permanent deletion must be explicitly confirmed")]
    ConfirmationRequired,
}

/// Decodes an `application/x-www-form-urlencoded` body.
pub fn parse_form<T>(body: &[u8]) -> Result<T, FormError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))
}

/// Checkbox semantics: `true`, `on`, `1` and `yes` confirm.
pub(crate) fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "on" | "1" | "yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_values() {
        assert!(is_checked(Some("on")));
        assert!(is_checked(Some("TRUE")));
        assert!(!is_checked(Some("false")));
        assert!(!is_checked(None));
    }
}
