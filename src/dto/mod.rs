//! DTO modules that bridge services with templates and APIs.

pub mod api;
pub mod feedback;
pub mod incidents;
pub mod volunteers;

use serde::Serialize;

use crate::presenter::Badge;

/// Count of records in one status, for the summary cards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusSummary {
    pub status: &'static str,
    pub badge: Badge,
    pub count: usize,
}
