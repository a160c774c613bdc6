//! Services backing the incident list and status updates.

use crate::domain::filter::{DateRange, FilterSpec, StatusEnum};
use crate::domain::incident::{IncidentStatus, IncidentStatusChange, Severity};
use crate::domain::transition::Transition;
use crate::domain::types::SearchTerm;
use crate::dto::incidents::{IncidentsPageData, IncidentsQuery};
use crate::forms::incidents::{IncidentStatusForm, IncidentStatusPayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Pager, Paginated};
use crate::presenter::{present_all, present_incident, present_status_summary};
use crate::repository::{IncidentListQuery, IncidentReader, IncidentWriter};
use crate::services::{
    INCIDENT_DISPATCHERS, INCIDENT_VIEWERS, ServiceError, ServiceResult, ensure_role, has_role,
};

/// Loads one filtered page of incidents.
pub fn load_incidents_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IncidentsQuery,
    page_size: usize,
) -> ServiceResult<IncidentsPageData>
where
    R: IncidentReader + ?Sized,
{
    ensure_role(user, INCIDENT_VIEWERS)?;

    let filter = FilterSpec::<IncidentStatus>::from_params(
        query.status.as_deref(),
        query.search.as_deref(),
        query.page.as_deref(),
        page_size,
    )?;
    let severity = Severity::parse_filter(query.severity.as_deref())?;
    let date_range = DateRange::parse_filter(query.date.as_deref())?;
    let list_query = IncidentListQuery::new(filter)
        .severity(severity)
        .date_range(date_range);

    let total = repo.count_incidents(&list_query).map_err(|err| {
        log::error!("Failed to count incidents: {err}");
        err
    })?;
    let pager = Pager::new(total, list_query.filter.page, page_size);

    let rows = repo.list_incidents(&list_query, &pager).map_err(|err| {
        log::error!("Failed to list incidents: {err}");
        err
    })?;
    let incidents = present_all(rows, present_incident).map_err(|err| {
        log::error!("Failed to present incidents: {err}");
        err
    })?;

    let counts = repo.count_incidents_by_status(&list_query).map_err(|err| {
        log::error!("Failed to count incidents by status: {err}");
        err
    })?;
    let summary = present_status_summary::<IncidentStatus>(counts).map_err(|err| {
        log::error!("Failed to summarise incidents: {err}");
        err
    })?;

    Ok(IncidentsPageData {
        incidents: Paginated::new(incidents, &pager),
        status: list_query.filter.status.as_param(),
        severity: list_query.severity.map_or("all", Severity::as_str),
        date: list_query.date_range.map_or("all", DateRange::as_str),
        search_query: list_query.filter.search.map(SearchTerm::into_inner),
        statuses: IncidentStatus::ALL.iter().map(|s| s.as_str()).collect(),
        can_update: has_role(user, INCIDENT_DISPATCHERS),
        summary,
    })
}

/// Moves an incident forward and records who did it.
pub fn update_incident_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: IncidentStatusForm,
) -> ServiceResult<Transition<IncidentStatus>>
where
    R: IncidentReader + IncidentWriter + ?Sized,
{
    ensure_role(user, INCIDENT_DISPATCHERS)?;

    let payload = IncidentStatusPayload::try_from(form)?;
    let id = payload.incident_id;

    let incident = repo
        .get_incident_by_id(id)
        .map_err(|err| {
            log::error!("Failed to load incident {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let transition = incident.status.advance_to(payload.status)?;

    if let Transition::Changed { from, to } = transition {
        let change = IncidentStatusChange {
            incident_id: id,
            from,
            to,
            changed_by: user.user_id()?,
            notes: payload.notes,
        };
        repo.record_incident_status(&change).map_err(|err| {
            log::error!("Failed to update incident {id}: {err}");
            err
        })?;
        log::info!("Incident {id} moved from '{from}' to '{to}' by {}", user.email);
    }

    Ok(transition)
}
