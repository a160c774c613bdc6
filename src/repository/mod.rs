use diesel::connection::Connection;
use diesel::deserialize::QueryableByName;
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel::{RunQueryDsl, sql_query};

use crate::db::{DbConnection, DbPool};
use crate::domain::feedback::{Feedback, FeedbackStats, FeedbackStatus, Visibility};
use crate::domain::filter::{DateRange, FilterSpec};
use crate::domain::incident::{Incident, IncidentStatus, IncidentStatusChange, Severity};
use crate::domain::types::{FeedbackId, IncidentId, VolunteerId};
use crate::domain::volunteer::{DeleteOutcome, Volunteer, VolunteerStatus};
use crate::models::{RowCount, StatusCount};
use crate::models::feedback::FeedbackRow;
use crate::models::incident::IncidentRow;
use crate::models::volunteer::VolunteerRow;
use crate::pagination::Pager;
use crate::query_builder::{SqlValue, WhereClause, bind_params};
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod errors;
pub mod feedback;
pub mod incident;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod volunteer;

/// Filtered volunteer list request.
#[derive(Debug, Clone, PartialEq)]
pub struct VolunteerListQuery {
    pub filter: FilterSpec<VolunteerStatus>,
}

/// Filtered feedback list request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackListQuery {
    pub filter: FilterSpec<FeedbackStatus>,
    pub visibility: Visibility,
}

/// Filtered incident list request.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentListQuery {
    pub filter: FilterSpec<IncidentStatus>,
    pub severity: Option<Severity>,
    pub date_range: Option<DateRange>,
}

impl VolunteerListQuery {
    pub fn new(filter: FilterSpec<VolunteerStatus>) -> Self {
        Self { filter }
    }
}

impl FeedbackListQuery {
    pub fn new(filter: FilterSpec<FeedbackStatus>) -> Self {
        Self {
            filter,
            visibility: Visibility::All,
        }
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

impl IncidentListQuery {
    pub fn new(filter: FilterSpec<IncidentStatus>) -> Self {
        Self {
            filter,
            severity: None,
            date_range: None,
        }
    }

    pub fn severity(mut self, severity: Option<Severity>) -> Self {
        self.severity = severity;
        self
    }

    pub fn date_range(mut self, date_range: Option<DateRange>) -> Self {
        self.date_range = date_range;
        self
    }
}

pub trait VolunteerReader {
    fn get_volunteer_by_id(&self, id: VolunteerId) -> RepositoryResult<Option<Volunteer>>;
    fn count_volunteers(&self, query: &VolunteerListQuery) -> RepositoryResult<usize>;
    fn list_volunteers(
        &self,
        query: &VolunteerListQuery,
        pager: &Pager,
    ) -> RepositoryResult<Vec<VolunteerRow>>;
    /// Raw stored status strings with their row counts.
    fn count_volunteers_by_status(&self) -> RepositoryResult<Vec<(String, usize)>>;
}

pub trait VolunteerWriter {
    fn set_volunteer_status(&self, id: VolunteerId, status: VolunteerStatus)
    -> RepositoryResult<()>;
    /// Removes the volunteer, its assignments and deactivates the linked account, atomically.
    fn delete_volunteer(&self, id: VolunteerId) -> RepositoryResult<DeleteOutcome>;
}

pub trait FeedbackReader {
    fn get_feedback_by_id(&self, id: FeedbackId) -> RepositoryResult<Option<Feedback>>;
    fn count_feedback(&self, query: &FeedbackListQuery) -> RepositoryResult<usize>;
    fn list_feedback(
        &self,
        query: &FeedbackListQuery,
        pager: &Pager,
    ) -> RepositoryResult<Vec<FeedbackRow>>;
    fn feedback_stats(&self) -> RepositoryResult<FeedbackStats>;
    /// Newest approved feedback, for the public testimonials feed.
    fn list_published_feedback(&self, limit: usize) -> RepositoryResult<Vec<Feedback>>;
}

pub trait FeedbackWriter {
    fn set_feedback_status(&self, id: FeedbackId, status: FeedbackStatus) -> RepositoryResult<()>;
    fn delete_feedback(&self, id: FeedbackId) -> RepositoryResult<()>;
}

pub trait IncidentReader {
    fn get_incident_by_id(&self, id: IncidentId) -> RepositoryResult<Option<Incident>>;
    fn count_incidents(&self, query: &IncidentListQuery) -> RepositoryResult<usize>;
    fn list_incidents(
        &self,
        query: &IncidentListQuery,
        pager: &Pager,
    ) -> RepositoryResult<Vec<IncidentRow>>;
    /// Raw stored status strings with their counts, under every filter but status.
    fn count_incidents_by_status(
        &self,
        query: &IncidentListQuery,
    ) -> RepositoryResult<Vec<(String, usize)>>;
}

pub trait IncidentWriter {
    /// Persists the status move and its audit row in one transaction.
    fn record_incident_status(&self, change: &IncidentStatusChange) -> RepositoryResult<()>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Runs `f` in a transaction: commit on `Ok`, full rollback on any `Err`.
    pub fn with_transaction<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T>,
    {
        let mut conn = self.conn()?;
        SqliteConnection::transaction::<T, RepositoryError, _>(&mut *conn, f)
            .map_err(|err| {
                log::error!("Transaction rolled back: {err}");
                RepositoryError::rolled_back(err)
            })
    }

    /// `SELECT COUNT(*)` over `table` narrowed by `clause`.
    fn count_where(&self, table: &'static str, clause: &WhereClause) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let sql = format!("SELECT COUNT(*) AS count FROM {table} {}", clause.to_sql());
        let row = bind_params(sql_query(sql).into_boxed::<Sqlite>(), clause.params())
            .get_result::<RowCount>(&mut conn)?;
        Ok(usize::try_from(row.count).unwrap_or_default())
    }

    /// `column` values of `table` narrowed by `clause`, with their row counts.
    fn group_count_where(
        &self,
        table: &'static str,
        column: &'static str,
        clause: &WhereClause,
    ) -> RepositoryResult<Vec<(String, usize)>> {
        let mut conn = self.conn()?;
        let sql = format!(
            "SELECT {column} AS status, COUNT(*) AS count FROM {table} {} \
             GROUP BY {column} ORDER BY {column}",
            clause.to_sql()
        );
        let rows = bind_params(sql_query(sql).into_boxed::<Sqlite>(), clause.params())
            .load::<StatusCount>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.status, usize::try_from(row.count).unwrap_or_default()))
            .collect())
    }

    /// One page of `columns` from `table` narrowed by `clause`.
    fn page_where<T>(
        &self,
        table: &'static str,
        columns: &'static str,
        clause: &WhereClause,
        order_by: &'static str,
        pager: &Pager,
    ) -> RepositoryResult<Vec<T>>
    where
        T: QueryableByName<Sqlite> + 'static,
    {
        let mut conn = self.conn()?;
        let sql = format!(
            "SELECT {columns} FROM {table} {} ORDER BY {order_by} LIMIT ? OFFSET ?",
            clause.to_sql()
        );

        let mut params = clause.params().to_vec();
        params.push(SqlValue::Integer(to_i64(pager.limit())));
        params.push(SqlValue::Integer(to_i64(pager.offset)));

        let rows = bind_params(sql_query(sql).into_boxed::<Sqlite>(), &params)
            .load::<T>(&mut conn)?;
        Ok(rows)
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
