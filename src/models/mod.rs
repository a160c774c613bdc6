//! Database models shared across the repository layer.

use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Text};

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod feedback;
pub mod incident;
pub mod volunteer;

/// Result of a `SELECT COUNT(*) AS count` raw query.
#[derive(Debug, QueryableByName)]
pub struct RowCount {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// One bucket of a `GROUP BY status` raw query.
#[derive(Debug, QueryableByName)]
pub struct StatusCount {
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
