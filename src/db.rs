//! SQLite connection pool used by the repository layer.
//!
//! Every connection handed out by the pool runs in WAL mode with foreign keys
//! enforced, so the explicit cascades in the repository cannot leave orphaned
//! association rows behind.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

diesel::define_sql_function! {
    /// Unicode-aware lowercase; SQLite's built-in `LOWER` only folds ASCII.
    fn unicode_lower(value: Nullable<Text>) -> Nullable<Text>;
}

/// SQL name of [`unicode_lower`], for hand-written predicates.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// Registers the application's SQL functions on a fresh connection.
pub fn register_sql_functions(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
    unicode_lower_utils::register_impl(conn, |value: Option<String>| {
        value.map(|value| value.to_lowercase())
    })
}

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug)]
/// Pragmas applied each time a connection is acquired from the pool.
pub struct ConnectionOptions {
    /// Enable Write Ahead Logging mode for SQLite.
    pub enable_wal: bool,
    /// Enforce foreign key checks for SQLite.
    pub enable_foreign_keys: bool,
    /// Timeout to wait for a locked database.
    pub busy_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enable_wal: true,
            enable_foreign_keys: true,
            busy_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        (|| {
            if self.enable_wal {
                conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            }
            if self.enable_foreign_keys {
                conn.batch_execute("PRAGMA foreign_keys = ON;")?;
            }
            if let Some(d) = self.busy_timeout {
                conn.batch_execute(&format!("PRAGMA busy_timeout = {};", d.as_millis()))?;
            }
            register_sql_functions(conn)
        })()
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a Diesel connection pool for the given database URL.
pub fn establish_connection_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size.max(1))
        .connection_customizer(Box::new(ConnectionOptions::default()))
        .build(manager)
        .inspect_err(|e| log::error!("Failed to build connection pool for {database_url}: {e}"))
}
