//! Test utilities for database operations.
//!
//! Provides helpers for setting up and tearing down `PostgreSQL` test databases.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use tracing::info;

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: std::env::var("TEST_DB_USER")
                .unwrap_or_else(|_| "accounts_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "accounts_test".to_string()),
            database: std::env::var("TEST_DB_NAME")
                .unwrap_or_else(|_| "accounts_test".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Get the database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    /// Get URL for the maintenance `postgres` database (for creating test DBs).
    #[must_use]
    pub fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/postgres",
            self.username, self.password, self.host, self.port
        )
    }
}

/// A migrated, uniquely named test database that is dropped by [`TestDatabase::drop_database`].
pub struct TestDatabase {
    /// Database connection, shared with the repositories under test.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Create a uniquely named database from the default config and run migrations.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let unique_suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("accounts_test_{}", &unique_suffix[..8]);

        let postgres_conn = Database::connect(&config.postgres_url()).await?;
        let create_db = format!("CREATE DATABASE \"{}\"", config.database);
        postgres_conn
            .execute(Statement::from_string(DatabaseBackend::Postgres, create_db))
            .await?;
        postgres_conn.close().await?;

        let conn = Database::connect(&config.database_url()).await?;
        crate::migrate(&conn)
            .await
            .map_err(|e| DbErr::Migration(e.to_string()))?;

        info!(database = %config.database, "Created unique test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Get a shared handle to the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.conn.clone()
    }

    /// Drop the test database.
    ///
    /// The pool is closed if this is the last handle. Otherwise the remaining
    /// sessions are terminated server-side below.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        match Arc::try_unwrap(self.conn) {
            Ok(conn) => conn.close().await?,
            Err(_) => {
                info!(database = %self.config.database, "Connection still shared, skipping close");
            }
        }

        let postgres_conn = Database::connect(&self.config.postgres_url()).await?;

        // Terminate stragglers so DROP DATABASE does not block
        let terminate = format!(
            "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
            self.config.database
        );
        postgres_conn
            .execute(Statement::from_string(DatabaseBackend::Postgres, terminate))
            .await
            .ok();

        let drop_db = format!("DROP DATABASE IF EXISTS \"{}\"", self.config.database);
        postgres_conn
            .execute(Statement::from_string(DatabaseBackend::Postgres, drop_db))
            .await?;
        postgres_conn.close().await?;

        info!(database = %self.config.database, "Dropped test database");
        Ok(())
    }
}
