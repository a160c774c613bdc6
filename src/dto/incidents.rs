//! DTOs used by the incident list page.

use serde::Serialize;

use crate::dto::StatusSummary;
use crate::pagination::Paginated;
use crate::presenter::Badge;

/// Query parameters accepted by the incident list service.
#[derive(Debug, Default)]
pub struct IncidentsQuery {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub date: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IncidentView {
    pub id: i32,
    /// External reference, or `#id` when the incident has none.
    pub reference: String,
    pub title: String,
    pub location: String,
    pub emergency_type: String,
    pub caller_name: Option<String>,
    pub severity: &'static str,
    pub severity_badge: Badge,
    pub status: &'static str,
    pub badge: Badge,
    pub reported_at: String,
}

#[derive(Debug, Serialize)]
pub struct IncidentsPageData {
    pub incidents: Paginated<IncidentView>,
    pub status: &'static str,
    pub severity: &'static str,
    pub date: &'static str,
    pub search_query: Option<String>,
    /// Statuses the current user may move incidents to, in order.
    pub statuses: Vec<&'static str>,
    pub can_update: bool,
    pub summary: Vec<StatusSummary>,
}
