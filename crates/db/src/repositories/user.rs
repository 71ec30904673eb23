//! User repository.

use std::sync::Arc;

use crate::entities::{AccountStatus, User, user};
use crate::hooks::RemovalHooks;
use accounts_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
    hooks: RemovalHooks,
}

impl UserRepository {
    /// Create a new user repository with no removal hooks.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self::with_hooks(db, RemovalHooks::new())
    }

    /// Create a user repository that runs `hooks` on [`hard_destroy`](Self::hard_destroy).
    #[must_use]
    pub const fn with_hooks(db: Arc<DatabaseConnection>, hooks: RemovalHooks) -> Self {
        Self { db, hooks }
    }

    /// Registered removal hooks.
    #[must_use]
    pub const fn hooks(&self) -> &RemovalHooks {
        &self.hooks
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::EmailLower.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a user. Only fields marked `Set` are written.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get users with the given status, newest first (paginated).
    pub async fn find_by_status(
        &self,
        status: AccountStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::Status.eq(status))
            .order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users with the given status.
    pub async fn count_by_status(&self, status: AccountStatus) -> AppResult<u64> {
        User::find()
            .filter(user::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Permanently delete a user row without running removal hooks.
    ///
    /// Deleting an unknown ID is a no-op.
    pub async fn hard_delete(&self, id: &str) -> AppResult<()> {
        let result = User::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            user_id = id,
            rows_affected = result.rows_affected,
            "Hard delete executed"
        );
        Ok(())
    }

    /// Permanently delete a user row, running removal hooks around the delete.
    ///
    /// The lookup, hooks and delete share one transaction. Before-hooks run in
    /// registration order, then the row is deleted, then after-hooks run. Any error
    /// rolls the whole transaction back. Destroying an unknown ID is a no-op and runs
    /// no hooks.
    pub async fn hard_destroy(&self, id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(user) = User::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        else {
            tracing::debug!(user_id = id, "Hard destroy skipped, user not found");
            return Ok(());
        };

        self.hooks.run_before(&txn, &user).await?;

        User::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.hooks.run_after(&txn, &user).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::hooks::RemovalHook;
    use async_trait::async_trait;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseTransaction, MockDatabase, MockExecResult, Set};
    use std::sync::Mutex;

    fn create_test_user(id: &str, status: AccountStatus) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            email_lower: format!("{id}@example.com"),
            user_name: Some("Test User".to_string()),
            encrypted_password: String::new(),
            reset_password_token: None,
            reset_password_sent_at: None,
            remember_created_at: None,
            sign_in_count: 0,
            current_sign_in_at: None,
            last_sign_in_at: None,
            current_sign_in_ip: None,
            last_sign_in_ip: None,
            confirmation_token: None,
            confirmed_at: Some(Utc::now().into()),
            confirmation_sent_at: None,
            unconfirmed_email: None,
            failed_attempts: 0,
            unlock_token: None,
            locked_at: None,
            status,
            deleted_at: None,
            banned_at: None,
            suspended_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    /// Records every hook call into a shared log.
    struct RecordingHook {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail_before: bool,
    }

    #[async_trait]
    impl RemovalHook for RecordingHook {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn before_remove(
            &self,
            _txn: &DatabaseTransaction,
            user: &user::Model,
        ) -> AppResult<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("before:{}:{}", self.name, user.id));
            if self.fail_before {
                return Err(AppError::Internal("cleanup refused".to_string()));
            }
            Ok(())
        }

        async fn after_remove(
            &self,
            _txn: &DatabaseTransaction,
            user: &user::Model,
        ) -> AppResult<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("after:{}:{}", self.name, user.id));
            Ok(())
        }
    }

    fn recording_hooks(log: &Arc<Mutex<Vec<String>>>, fail_first: bool) -> RemovalHooks {
        RemovalHooks::new()
            .with(Arc::new(RecordingHook {
                name: "first",
                log: log.clone(),
                fail_before: fail_first,
            }))
            .with(Arc::new(RecordingHook {
                name: "second",
                log: log.clone(),
                fail_before: false,
            }))
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user("user1", AccountStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id("user1").await.unwrap();

        assert!(result.is_some());
        let found_user = result.unwrap();
        assert_eq!(found_user.id, "user1");
        assert!(found_user.is_active());
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id("nonexistent").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let user = create_test_user("user1", AccountStatus::Inactive);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_email("USER1@example.com").await.unwrap();

        assert_eq!(result.unwrap().email_lower, "user1@example.com");
    }

    #[tokio::test]
    async fn test_create_user() {
        let user = create_test_user("user1", AccountStatus::Inactive);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let active = user::ActiveModel::new_account(
            "user1".to_string(),
            "user1@example.com",
            Some("Test User".to_string()),
        );

        let result = repo.create(active).await.unwrap();
        assert!(result.is_inactive());
        assert!(result.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_update_database_error() {
        let user = create_test_user("user1", AccountStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([sea_orm::DbErr::Custom("storage offline".to_string())])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let mut active: user::ActiveModel = user.into();
        active.status = Set(AccountStatus::Banned);

        let result = repo.update(active).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let user1 = create_test_user("user1", AccountStatus::Banned);
        let user2 = create_test_user("user2", AccountStatus::Banned);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user1, user2]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo
            .find_by_status(AccountStatus::Banned, 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(user::Model::is_banned));
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let count = repo
            .count_by_status(AccountStatus::Suspended)
            .await
            .unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_hard_delete_unknown_id_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert!(repo.hard_delete("nonexistent").await.is_ok());
    }

    #[tokio::test]
    async fn test_hard_delete_skips_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::with_hooks(db, recording_hooks(&log, false));
        repo.hard_delete("user1").await.unwrap();

        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hard_destroy_runs_hooks_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let user = create_test_user("user1", AccountStatus::Deleted);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::with_hooks(db, recording_hooks(&log, false));
        repo.hard_destroy("user1").await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "before:first:user1",
                "before:second:user1",
                "after:first:user1",
                "after:second:user1",
            ]
        );
    }

    #[tokio::test]
    async fn test_hard_destroy_unknown_id_runs_no_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::with_hooks(db, recording_hooks(&log, false));
        assert!(repo.hard_destroy("nonexistent").await.is_ok());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hard_destroy_aborts_on_hook_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let user = create_test_user("user1", AccountStatus::Active);

        // No exec result is queued: reaching the DELETE would fail the test with
        // a mock error instead of the hook error.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let repo = UserRepository::with_hooks(db, recording_hooks(&log, true));
        let result = repo.hard_destroy("user1").await;

        assert!(matches!(
            result,
            Err(AppError::Hook { hook: "first", .. })
        ));
        assert_eq!(*log.lock().unwrap(), vec!["before:first:user1"]);
    }
}
