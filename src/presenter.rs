//! List presenter: turns raw list rows into display records.
//!
//! Status strings map through closed tables (one exhaustive `match` per
//! enum) to a [`Badge`]. A stored value outside the table is a data defect
//! and surfaces as [`PresentError::Mapping`] instead of rendering blank.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::domain::feedback::{Feedback, FeedbackStatus};
use crate::domain::filter::StatusEnum;
use crate::domain::incident::{IncidentStatus, Severity};
use crate::domain::volunteer::VolunteerStatus;
use crate::dto::StatusSummary;
use crate::dto::api::PublishedFeedback;
use crate::dto::feedback::FeedbackView;
use crate::dto::incidents::IncidentView;
use crate::dto::volunteers::VolunteerView;
use crate::models::feedback::FeedbackRow;
use crate::models::incident::IncidentRow;
use crate::models::volunteer::VolunteerRow;

const DATE_FORMAT: &str = "%b %d, %Y";
const DATETIME_FORMAT: &str = "%b %d, %Y %H:%M";
const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresentError {
    #[error("no display mapping for {entity} value '{value}'")]
    Mapping { entity: &'static str, value: String },
    #[error("unparseable timestamp '{0}'")]
    Format(String),
}

/// Presentation descriptor of an enum value.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Badge {
    pub class: &'static str,
    pub label: &'static str,
}

impl Badge {
    const fn new(class: &'static str, label: &'static str) -> Self {
        Self { class, label }
    }
}

/// Closed mapping from a status variant to its badge.
pub trait BadgeMapping: StatusEnum {
    fn badge(self) -> Badge;
}

impl BadgeMapping for VolunteerStatus {
    fn badge(self) -> Badge {
        match self {
            VolunteerStatus::New => Badge::new("status-new", "New Volunteer"),
            VolunteerStatus::Active => Badge::new("status-active", "Active"),
            VolunteerStatus::Inactive => Badge::new("status-inactive", "Inactive"),
            VolunteerStatus::OnLeave => Badge::new("status-on-leave", "On Leave"),
        }
    }
}

impl BadgeMapping for FeedbackStatus {
    fn badge(self) -> Badge {
        match self {
            FeedbackStatus::Pending => Badge::new("status-pending", "Pending"),
            FeedbackStatus::Approved => Badge::new("status-approved", "Approved"),
            FeedbackStatus::Rejected => Badge::new("status-rejected", "Rejected"),
        }
    }
}

impl BadgeMapping for IncidentStatus {
    fn badge(self) -> Badge {
        match self {
            IncidentStatus::Pending => Badge::new("status-pending", "Pending"),
            IncidentStatus::Processing => Badge::new("status-processing", "Processing"),
            IncidentStatus::Responded => Badge::new("status-responded", "Responded"),
            IncidentStatus::Closed => Badge::new("status-closed", "Closed"),
        }
    }
}

pub fn severity_badge(severity: Severity) -> Badge {
    match severity {
        Severity::Critical => Badge::new("severity-critical", "Critical"),
        Severity::High => Badge::new("severity-high", "High"),
        Severity::Medium => Badge::new("severity-medium", "Medium"),
        Severity::Low => Badge::new("severity-low", "Low"),
    }
}

/// Parses a stored status string, failing loudly on values outside the enum.
pub fn map_status<S: StatusEnum>(raw: &str) -> Result<S, PresentError> {
    S::parse(raw).ok_or_else(|| PresentError::Mapping {
        entity: S::ENTITY,
        value: raw.to_string(),
    })
}

fn map_severity(raw: &str) -> Result<Severity, PresentError> {
    Severity::parse(raw).ok_or_else(|| PresentError::Mapping {
        entity: "severity",
        value: raw.to_string(),
    })
}

/// Joins the non-empty trimmed parts with single spaces.
pub fn compose_name(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercased first character, for avatar placeholders.
pub fn avatar_initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, PresentError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| PresentError::Format(raw.to_string()))
}

/// Renders a stored date or timestamp as `Mon DD, YYYY`.
pub fn format_timestamp(raw: &str) -> Result<String, PresentError> {
    parse_timestamp(raw).map(|value| value.format(DATE_FORMAT).to_string())
}

/// Renders a stored timestamp as `Mon DD, YYYY HH:MM`.
pub fn format_datetime(raw: &str) -> Result<String, PresentError> {
    parse_timestamp(raw).map(|value| value.format(DATETIME_FORMAT).to_string())
}

/// `Anonymous` when hidden, otherwise `name (email)` with whichever parts exist.
pub fn feedback_display_name(
    is_anonymous: bool,
    name: Option<&str>,
    email: Option<&str>,
) -> String {
    if is_anonymous {
        return ANONYMOUS.to_string();
    }
    let name = name.map(str::trim).filter(|s| !s.is_empty());
    let email = email.map(str::trim).filter(|s| !s.is_empty());
    match (name, email) {
        (Some(name), Some(email)) => format!("{name} ({email})"),
        (Some(name), None) => name.to_string(),
        (None, Some(email)) => email.to_string(),
        (None, None) => ANONYMOUS.to_string(),
    }
}

/// Strips markup from free text submitted by the public.
pub fn sanitize_message(message: &str) -> String {
    ammonia::Builder::empty().clean(message).to_string()
}

pub fn present_volunteer(row: VolunteerRow) -> Result<VolunteerView, PresentError> {
    let status = map_status::<VolunteerStatus>(&row.volunteer_status)?;
    let name = compose_name(&[
        Some(row.first_name.as_str()),
        row.middle_name.as_deref(),
        Some(row.last_name.as_str()),
    ]);

    Ok(VolunteerView {
        id: row.id,
        initial: avatar_initial(&name),
        name,
        email: row.email,
        contact_number: row.contact_number,
        status: status.as_str(),
        badge: status.badge(),
        application_date: format_timestamp(&row.application_date)?,
    })
}

pub fn present_feedback(row: FeedbackRow) -> Result<FeedbackView, PresentError> {
    let status = map_status::<FeedbackStatus>(&row.status)?;

    Ok(FeedbackView {
        id: row.id,
        display_name: feedback_display_name(
            row.is_anonymous,
            row.name.as_deref(),
            row.email.as_deref(),
        ),
        message: sanitize_message(&row.message),
        rating: row.rating,
        is_anonymous: row.is_anonymous,
        status: status.as_str(),
        badge: status.badge(),
        submitted_at: format_timestamp(&row.created_at)?,
    })
}

/// Detail view of a single feedback entry loaded by id.
pub fn present_feedback_record(feedback: Feedback) -> FeedbackView {
    FeedbackView {
        id: feedback.id.get(),
        display_name: feedback_display_name(
            feedback.is_anonymous,
            feedback.name.as_deref(),
            feedback.email.as_deref(),
        ),
        message: sanitize_message(&feedback.message),
        rating: feedback.rating,
        is_anonymous: feedback.is_anonymous,
        status: feedback.status.as_str(),
        badge: feedback.status.badge(),
        submitted_at: feedback.created_at.format(DATE_FORMAT).to_string(),
    }
}

/// Public testimonial: the author's email is never exposed.
pub fn present_published(feedback: Feedback) -> PublishedFeedback {
    let name = if feedback.is_anonymous {
        None
    } else {
        feedback.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    };

    PublishedFeedback {
        id: feedback.id.get(),
        name: name.unwrap_or(ANONYMOUS).to_string(),
        message: sanitize_message(&feedback.message),
        rating: feedback.rating,
        created_at: feedback.created_at.format(DATE_FORMAT).to_string(),
    }
}

pub fn present_incident(row: IncidentRow) -> Result<IncidentView, PresentError> {
    let status = map_status::<IncidentStatus>(&row.status)?;
    let severity = map_severity(&row.severity)?;

    Ok(IncidentView {
        id: row.id,
        reference: row
            .external_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("#{}", row.id)),
        title: row.title,
        location: row.location,
        emergency_type: row.emergency_type,
        caller_name: row.caller_name,
        severity: severity.as_str(),
        severity_badge: severity_badge(severity),
        status: status.as_str(),
        badge: status.badge(),
        reported_at: format_datetime(&row.created_at)?,
    })
}

/// One summary entry per status in display order; statuses without rows count zero.
pub fn present_status_summary<S: BadgeMapping>(
    counts: Vec<(String, usize)>,
) -> Result<Vec<StatusSummary>, PresentError> {
    let mut totals = S::ALL
        .iter()
        .map(|status| (*status, 0usize))
        .collect::<Vec<_>>();

    for (raw, count) in counts {
        let status = map_status::<S>(&raw)?;
        if let Some(entry) = totals.iter_mut().find(|(s, _)| *s == status) {
            entry.1 += count;
        }
    }

    Ok(totals
        .into_iter()
        .map(|(status, count)| StatusSummary {
            status: status.as_str(),
            badge: status.badge(),
            count,
        })
        .collect())
}

/// Maps a page of rows, stopping at the first defective row.
pub fn present_all<R, V>(
    rows: Vec<R>,
    present: impl Fn(R) -> Result<V, PresentError>,
) -> Result<Vec<V>, PresentError> {
    rows.into_iter().map(present).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volunteer_row(status: &str) -> VolunteerRow {
        VolunteerRow {
            id: 1,
            first_name: " ana ".into(),
            middle_name: Some("".into()),
            last_name: "Reyes".into(),
            email: "ana@example.com".into(),
            contact_number: "0917".into(),
            volunteer_status: status.into(),
            application_date: "2025-03-01".into(),
        }
    }

    #[test]
    fn compose_name_skips_empty_parts() {
        assert_eq!(
            compose_name(&[Some(" Juan "), None, Some(""), Some("Cruz")]),
            "Juan Cruz"
        );
        assert_eq!(compose_name(&[None, Some("  ")]), "");
    }

    #[test]
    fn every_volunteer_status_has_a_badge() {
        for status in VolunteerStatus::ALL {
            assert!(!status.badge().class.is_empty());
        }
        assert_eq!(VolunteerStatus::OnLeave.badge().class, "status-on-leave");
    }

    #[test]
    fn unknown_status_is_a_mapping_error() {
        let err = present_volunteer(volunteer_row("Retired")).unwrap_err();
        assert_eq!(
            err,
            PresentError::Mapping {
                entity: "volunteer",
                value: "Retired".into()
            }
        );
    }

    #[test]
    fn volunteer_row_is_presented() {
        let view = present_volunteer(volunteer_row("New Volunteer")).expect("presentable");
        assert_eq!(view.name, "ana Reyes");
        assert_eq!(view.initial, "A");
        assert_eq!(view.badge.label, "New Volunteer");
        assert_eq!(view.application_date, "Mar 01, 2025");
    }

    #[test]
    fn timestamps_accept_sqlite_and_iso_forms() {
        assert_eq!(
            format_timestamp("2024-12-05 14:03:00").as_deref(),
            Ok("Dec 05, 2024")
        );
        assert_eq!(
            format_timestamp("2024-12-05T14:03:00.125").as_deref(),
            Ok("Dec 05, 2024")
        );
        assert_eq!(
            format_datetime("2024-12-05 14:03:00").as_deref(),
            Ok("Dec 05, 2024 14:03")
        );
        assert!(matches!(
            format_timestamp("yesterday"),
            Err(PresentError::Format(_))
        ));
    }

    #[test]
    fn anonymous_feedback_hides_identity() {
        assert_eq!(
            feedback_display_name(true, Some("Ana"), Some("ana@example.com")),
            "Anonymous"
        );
        assert_eq!(
            feedback_display_name(false, Some("Ana"), Some("ana@example.com")),
            "Ana (ana@example.com)"
        );
        assert_eq!(feedback_display_name(false, None, None), "Anonymous");
    }

    #[test]
    fn feedback_message_is_stripped_of_markup() {
        let row = FeedbackRow {
            id: 2,
            name: None,
            email: None,
            message: "Great <script>alert(1)</script><b>team</b>".into(),
            rating: 5,
            is_anonymous: true,
            status: "approved".into(),
            created_at: "2025-01-02 10:00:00".into(),
        };
        let view = present_feedback(row).expect("presentable");
        assert!(!view.message.contains('<'));
        assert!(view.message.contains("team"));
    }

    #[test]
    fn incident_without_external_id_uses_row_id() {
        let row = IncidentRow {
            id: 17,
            external_id: None,
            title: "House fire".into(),
            location: "Main St".into(),
            emergency_type: "fire".into(),
            severity: "critical".into(),
            status: "processing".into(),
            caller_name: Some("Ben".into()),
            created_at: "2025-05-06 07:08:09".into(),
        };
        let view = present_incident(row).expect("presentable");
        assert_eq!(view.reference, "#17");
        assert_eq!(view.severity_badge.class, "severity-critical");
        assert_eq!(view.reported_at, "May 06, 2025 07:08");
    }

    #[test]
    fn unknown_severity_is_a_mapping_error() {
        let row = IncidentRow {
            id: 1,
            external_id: Some("INC-1".into()),
            title: "t".into(),
            location: "l".into(),
            emergency_type: "e".into(),
            severity: "apocalyptic".into(),
            status: "pending".into(),
            caller_name: None,
            created_at: "2025-05-06 07:08:09".into(),
        };
        assert!(matches!(
            present_incident(row),
            Err(PresentError::Mapping { entity: "severity", .. })
        ));
    }

    #[test]
    fn status_summary_lists_every_status_in_order() {
        let summary = present_status_summary::<IncidentStatus>(vec![
            ("closed".into(), 4),
            ("pending".into(), 2),
        ])
        .expect("known statuses");
        let counts = summary
            .iter()
            .map(|entry| (entry.status, entry.count))
            .collect::<Vec<_>>();
        assert_eq!(
            counts,
            vec![("pending", 2), ("processing", 0), ("responded", 0), ("closed", 4)]
        );
    }

    #[test]
    fn status_summary_rejects_unknown_values() {
        let result = present_status_summary::<IncidentStatus>(vec![("archived".into(), 1)]);
        assert!(matches!(
            result,
            Err(PresentError::Mapping { entity: "incident", .. })
        ));
    }
}
