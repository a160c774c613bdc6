//! DTOs exposed by the JSON API endpoints.

use serde::Serialize;

/// Public testimonial entry; anonymous authors are never revealed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublishedFeedback {
    pub id: i32,
    pub name: String,
    pub message: String,
    pub rating: i32,
    pub created_at: String,
}
