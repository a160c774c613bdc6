use chrono::Utc;
use diesel::prelude::*;

use crate::domain::filter::{StatusEnum, StatusFilter};
use crate::domain::incident::{Incident, IncidentStatus, IncidentStatusChange};
use crate::domain::types::IncidentId;
use crate::models::incident::{IncidentRow, NewIncidentStatusLog};
use crate::pagination::Pager;
use crate::query_builder::{QueryBuilder, WhereClause};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, IncidentListQuery, IncidentReader, IncidentWriter};

const TABLE: &str = "incidents";
const ORDER_BY: &str = "created_at DESC, id DESC";
const SEARCHABLE: &[&str] = &[
    "external_id",
    "title",
    "location",
    "description",
    "caller_name",
    "emergency_type",
];

fn where_clause(query: &IncidentListQuery) -> WhereClause {
    where_clause_with_status(query, &query.filter.status)
}

/// Date ranges are evaluated against the UTC clock, like `CURRENT_TIMESTAMP`.
fn where_clause_with_status(
    query: &IncidentListQuery,
    status: &StatusFilter<IncidentStatus>,
) -> WhereClause {
    let builder = QueryBuilder::new().status("status", status);
    let builder = match query.severity {
        Some(severity) => builder.equals("severity", severity.as_str()),
        None => builder,
    };
    let window = query
        .date_range
        .map(|range| range.window(Utc::now().naive_utc()));
    builder
        .within("created_at", window)
        .search(SEARCHABLE, query.filter.search.as_ref())
        .build()
}

impl IncidentReader for DieselRepository {
    fn get_incident_by_id(&self, id: IncidentId) -> RepositoryResult<Option<Incident>> {
        use crate::models::incident::Incident as DbIncident;
        use crate::schema::incidents;

        let mut conn = self.conn()?;
        let incident = incidents::table
            .find(id.get())
            .first::<DbIncident>(&mut conn)
            .optional()?;

        incident
            .map(Incident::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn count_incidents(&self, query: &IncidentListQuery) -> RepositoryResult<usize> {
        self.count_where(TABLE, &where_clause(query))
    }

    fn list_incidents(
        &self,
        query: &IncidentListQuery,
        pager: &Pager,
    ) -> RepositoryResult<Vec<IncidentRow>> {
        self.page_where(
            TABLE,
            IncidentRow::COLUMNS,
            &where_clause(query),
            ORDER_BY,
            pager,
        )
    }

    fn count_incidents_by_status(
        &self,
        query: &IncidentListQuery,
    ) -> RepositoryResult<Vec<(String, usize)>> {
        let clause = where_clause_with_status(query, &StatusFilter::All);
        self.group_count_where(TABLE, "status", &clause)
    }
}

impl IncidentWriter for DieselRepository {
    fn record_incident_status(&self, change: &IncidentStatusChange) -> RepositoryResult<()> {
        use crate::schema::{incident_status_logs, incidents};

        self.with_transaction(|conn| {
            // Guarded on the old status so a concurrent move is not overwritten.
            let affected = diesel::update(
                incidents::table
                    .find(change.incident_id.get())
                    .filter(incidents::status.eq(change.from.as_str())),
            )
            .set(incidents::status.eq(change.to.as_str()))
            .execute(conn)?;

            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            if change.to >= IncidentStatus::Responded {
                diesel::update(
                    incidents::table
                        .find(change.incident_id.get())
                        .filter(incidents::responded_at.is_null()),
                )
                .set(incidents::responded_at.eq(Some(Utc::now().naive_utc())))
                .execute(conn)?;
            }

            diesel::insert_into(incident_status_logs::table)
                .values(NewIncidentStatusLog::from(change))
                .execute(conn)?;

            Ok(())
        })
    }
}
