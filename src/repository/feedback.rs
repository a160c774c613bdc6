use diesel::prelude::*;
use diesel::sql_query;

use crate::domain::feedback::{Feedback, FeedbackStats, FeedbackStatus};
use crate::domain::filter::StatusEnum;
use crate::domain::types::FeedbackId;
use crate::models::feedback::{FeedbackRow, FeedbackStatsRow};
use crate::pagination::Pager;
use crate::query_builder::{QueryBuilder, WhereClause};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, FeedbackListQuery, FeedbackReader, FeedbackWriter};

const TABLE: &str = "feedbacks";
const ORDER_BY: &str = "created_at DESC, id DESC";
const SEARCHABLE: &[&str] = &["message", "name", "email"];

fn where_clause(query: &FeedbackListQuery) -> WhereClause {
    let builder = QueryBuilder::new().status("status", &query.filter.status);
    let builder = match query.visibility.anonymous_flag() {
        Some(flag) => builder.equals("is_anonymous", flag),
        None => builder,
    };
    builder
        .search(SEARCHABLE, query.filter.search.as_ref())
        .build()
}

impl FeedbackReader for DieselRepository {
    fn get_feedback_by_id(&self, id: FeedbackId) -> RepositoryResult<Option<Feedback>> {
        use crate::models::feedback::Feedback as DbFeedback;
        use crate::schema::feedbacks;

        let mut conn = self.conn()?;
        let feedback = feedbacks::table
            .find(id.get())
            .first::<DbFeedback>(&mut conn)
            .optional()?;

        feedback
            .map(Feedback::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn count_feedback(&self, query: &FeedbackListQuery) -> RepositoryResult<usize> {
        self.count_where(TABLE, &where_clause(query))
    }

    fn list_feedback(
        &self,
        query: &FeedbackListQuery,
        pager: &Pager,
    ) -> RepositoryResult<Vec<FeedbackRow>> {
        self.page_where(
            TABLE,
            FeedbackRow::COLUMNS,
            &where_clause(query),
            ORDER_BY,
            pager,
        )
    }

    fn feedback_stats(&self) -> RepositoryResult<FeedbackStats> {
        let mut conn = self.conn()?;
        let row = sql_query(
            "SELECT COUNT(*) AS total, \
             COALESCE(SUM(status = 'pending'), 0) AS pending, \
             COALESCE(SUM(status = 'approved'), 0) AS approved, \
             COALESCE(SUM(status = 'rejected'), 0) AS rejected, \
             COALESCE(SUM(is_anonymous), 0) AS anonymous, \
             AVG(rating) AS average_rating \
             FROM feedbacks",
        )
        .get_result::<FeedbackStatsRow>(&mut conn)?;

        Ok(row.into())
    }

    fn list_published_feedback(&self, limit: usize) -> RepositoryResult<Vec<Feedback>> {
        use crate::models::feedback::Feedback as DbFeedback;
        use crate::schema::feedbacks;

        let mut conn = self.conn()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = feedbacks::table
            .filter(feedbacks::status.eq(FeedbackStatus::Approved.as_str()))
            .order((feedbacks::created_at.desc(), feedbacks::id.desc()))
            .limit(limit)
            .load::<DbFeedback>(&mut conn)?;

        rows.into_iter()
            .map(|row| Feedback::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl FeedbackWriter for DieselRepository {
    fn set_feedback_status(&self, id: FeedbackId, status: FeedbackStatus) -> RepositoryResult<()> {
        use crate::schema::feedbacks;

        let mut conn = self.conn()?;
        let affected = diesel::update(feedbacks::table.find(id.get()))
            .set(feedbacks::status.eq(status.as_str()))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_feedback(&self, id: FeedbackId) -> RepositoryResult<()> {
        use crate::schema::feedbacks;

        let mut conn = self.conn()?;
        let affected = diesel::delete(feedbacks::table.find(id.get())).execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
