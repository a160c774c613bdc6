//! DTOs used by the feedback moderation page.

use serde::Serialize;

use crate::domain::feedback::FeedbackStats;
use crate::pagination::Paginated;
use crate::presenter::Badge;

/// Query parameters accepted by the feedback list service.
#[derive(Debug, Default)]
pub struct FeedbackQuery {
    pub status: Option<String>,
    pub visibility: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackView {
    pub id: i32,
    /// `Anonymous` or `name (email)`.
    pub display_name: String,
    /// Message with markup stripped.
    pub message: String,
    pub rating: i32,
    pub is_anonymous: bool,
    pub status: &'static str,
    pub badge: Badge,
    pub submitted_at: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackPageData {
    pub feedback: Paginated<FeedbackView>,
    pub stats: FeedbackStats,
    pub status: &'static str,
    pub visibility: &'static str,
    pub search_query: Option<String>,
}

/// What a feedback moderation action did, for the flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackActionOutcome {
    StatusChanged { to: &'static str },
    Unchanged { status: &'static str },
    Deleted,
}
