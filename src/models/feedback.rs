//! Diesel models for citizen feedback.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Double, Integer, Nullable, Text};

use crate::domain::feedback::{Feedback as DomainFeedback, FeedbackStats, FeedbackStatus};
use crate::domain::filter::StatusEnum;
use crate::domain::types::{FeedbackId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::feedbacks)]
pub struct Feedback {
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    pub rating: i32,
    pub is_anonymous: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Raw list row used by the moderation table.
#[derive(Debug, Clone, QueryableByName, PartialEq)]
pub struct FeedbackRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub email: Option<String>,
    #[diesel(sql_type = Text)]
    pub message: String,
    #[diesel(sql_type = Integer)]
    pub rating: i32,
    #[diesel(sql_type = Bool)]
    pub is_anonymous: bool,
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = Text)]
    pub created_at: String,
}

impl FeedbackRow {
    pub const COLUMNS: &'static str =
        "id, name, email, message, rating, is_anonymous, status, created_at";
}

#[derive(Debug, QueryableByName)]
pub struct FeedbackStatsRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub pending: i64,
    #[diesel(sql_type = BigInt)]
    pub approved: i64,
    #[diesel(sql_type = BigInt)]
    pub rejected: i64,
    #[diesel(sql_type = BigInt)]
    pub anonymous: i64,
    #[diesel(sql_type = Nullable<Double>)]
    pub average_rating: Option<f64>,
}

impl TryFrom<Feedback> for DomainFeedback {
    type Error = TypeConstraintError;

    fn try_from(feedback: Feedback) -> Result<Self, Self::Error> {
        let status = FeedbackStatus::parse(&feedback.status).ok_or_else(|| {
            TypeConstraintError::InvalidValue(format!("feedback status '{}'", feedback.status))
        })?;

        Ok(Self {
            id: FeedbackId::new(feedback.id)?,
            name: feedback.name,
            email: feedback.email,
            message: feedback.message,
            rating: feedback.rating,
            is_anonymous: feedback.is_anonymous,
            status,
            created_at: feedback.created_at,
        })
    }
}

impl From<FeedbackStatsRow> for FeedbackStats {
    fn from(row: FeedbackStatsRow) -> Self {
        let count = |value: i64| usize::try_from(value).unwrap_or_default();
        Self {
            total: count(row.total),
            pending: count(row.pending),
            approved: count(row.approved),
            rejected: count(row.rejected),
            anonymous: count(row.anonymous),
            average_rating: row.average_rating,
        }
    }
}
