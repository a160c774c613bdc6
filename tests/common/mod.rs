#![allow(dead_code)]

use diesel::connection::SimpleConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use frs_admin::db::{DbConnection, DbPool, establish_connection_pool};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temporary directory for one test.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("utf-8 path").to_string();

        let pool = establish_connection_pool(&url, 2).expect("build pool");
        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn conn(&self) -> DbConnection {
        self.pool.get().expect("get connection")
    }

    pub fn execute(&self, sql: &str) {
        self.conn().batch_execute(sql).expect("execute seed sql");
    }

    pub fn insert_user(&self, id: i32, email: &str) {
        self.execute(&format!(
            "INSERT INTO users (id, first_name, last_name, email, role, is_verified) \
             VALUES ({id}, 'Test', 'User', '{email}', 'USER', 1);"
        ));
    }

    pub fn insert_volunteer(
        &self,
        id: i32,
        user_id: Option<i32>,
        (first_name, last_name): (&str, &str),
        email: &str,
        status: &str,
    ) {
        let user_id = user_id.map_or("NULL".to_string(), |id| id.to_string());
        self.execute(&format!(
            "INSERT INTO volunteers \
             (id, user_id, first_name, last_name, email, contact_number, volunteer_status) \
             VALUES ({id}, {user_id}, '{first_name}', '{last_name}', '{email}', '0917{id:07}', '{status}');"
        ));
    }

    pub fn insert_assignments(&self, volunteer_id: i32, count: usize) {
        for unit in 0..count {
            self.execute(&format!(
                "INSERT INTO volunteer_assignments (volunteer_id, unit_id) \
                 VALUES ({volunteer_id}, {unit});"
            ));
        }
    }

    pub fn insert_feedback(
        &self,
        name: Option<&str>,
        message: &str,
        rating: i32,
        is_anonymous: bool,
        status: &str,
    ) {
        let name = name.map_or("NULL".to_string(), |name| format!("'{name}'"));
        let anonymous = i32::from(is_anonymous);
        self.execute(&format!(
            "INSERT INTO feedbacks (name, message, rating, is_anonymous, status) \
             VALUES ({name}, '{message}', {rating}, {anonymous}, '{status}');"
        ));
    }

    pub fn insert_incident(&self, id: i32, title: &str, severity: &str, status: &str) {
        self.execute(&format!(
            "INSERT INTO incidents (id, external_id, title, location, severity, status) \
             VALUES ({id}, 'INC-{id}', '{title}', 'North ridge', '{severity}', '{status}');"
        ));
    }

    pub fn scalar(&self, sql: &str) -> i64 {
        use diesel::RunQueryDsl;
        use diesel::sql_query;
        use diesel::sql_types::BigInt;

        #[derive(diesel::QueryableByName)]
        struct Scalar {
            #[diesel(sql_type = BigInt)]
            value: i64,
        }

        sql_query(sql)
            .get_result::<Scalar>(&mut self.conn())
            .expect("scalar query")
            .value
    }
}
