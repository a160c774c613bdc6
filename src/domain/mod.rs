//! Domain aggregates exposed by the administration service layer.

pub mod feedback;
pub mod filter;
pub mod incident;
pub mod transition;
pub mod types;
pub mod volunteer;
