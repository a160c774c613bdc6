//! DTOs used by the volunteer management page.

use serde::Serialize;

use crate::domain::volunteer::DeleteOutcome;
use crate::dto::StatusSummary;
use crate::pagination::Paginated;
use crate::presenter::Badge;

/// Query parameters accepted by the volunteer list service.
#[derive(Debug, Default)]
pub struct VolunteersQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

/// One row of the volunteer table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VolunteerView {
    pub id: i32,
    pub name: String,
    pub initial: String,
    pub email: String,
    pub contact_number: String,
    pub status: &'static str,
    pub badge: Badge,
    pub application_date: String,
}

/// Data required to render the volunteer list template.
#[derive(Debug, Serialize)]
pub struct VolunteersPageData {
    pub volunteers: Paginated<VolunteerView>,
    /// Selected status filter echoed back to the UI, `all` when unset.
    pub status: &'static str,
    pub search_query: Option<String>,
    pub summary: Vec<StatusSummary>,
}

/// What a volunteer action did, for the flash message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolunteerActionOutcome {
    StatusChanged { to: &'static str },
    Unchanged { status: &'static str },
    Deleted(DeleteOutcome),
}
