//! Account status lifecycle service.
//!
//! Accounts move freely between `inactive`, `active`, `banned`, `deleted` and
//! `suspended`; no transition is ever refused. Entering `banned`, `deleted` or
//! `suspended` stamps the matching timestamp and leaves the other two untouched, so
//! an account can carry a timestamp from an earlier status. Only
//! [`StatusChange::Reactivate`] clears all three.

use accounts_common::{AppError, AppResult, IdGenerator};
use accounts_db::{
    entities::{AccountStatus, user},
    repositories::UserRepository,
};
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{Iterable, Set};
use serde::Deserialize;
use validator::Validate;

/// A status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// `deleted`, stamps `deleted_at`. The row is kept.
    SoftDelete,
    /// `banned`, stamps `banned_at`.
    Ban,
    /// `suspended`, stamps `suspended_at`.
    Suspend,
    /// `active`, timestamps untouched.
    Activate,
    /// `active`, clears `deleted_at`, `banned_at` and `suspended_at`.
    Reactivate,
}

impl StatusChange {
    /// Status the account is in after this change.
    #[must_use]
    pub const fn target(&self) -> AccountStatus {
        match self {
            Self::SoftDelete => AccountStatus::Deleted,
            Self::Ban => AccountStatus::Banned,
            Self::Suspend => AccountStatus::Suspended,
            Self::Activate | Self::Reactivate => AccountStatus::Active,
        }
    }

    /// Mark the columns this change writes. Everything else keeps its current value.
    pub fn apply(&self, model: &mut user::ActiveModel, now: DateTime<FixedOffset>) {
        model.status = Set(self.target());
        match self {
            Self::SoftDelete => model.deleted_at = Set(Some(now)),
            Self::Ban => model.banned_at = Set(Some(now)),
            Self::Suspend => model.suspended_at = Set(Some(now)),
            Self::Activate => {}
            Self::Reactivate => {
                model.deleted_at = Set(None);
                model.banned_at = Set(None);
                model.suspended_at = Set(None);
            }
        }
        model.updated_at = Set(Some(now));
    }
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountInput {
    #[validate(email, length(max = 320))]
    pub email: String,

    #[validate(length(min = 1, max = 256))]
    pub user_name: Option<String>,
}

/// Account status lifecycle service.
#[derive(Clone)]
pub struct AccountStatusService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AccountStatusService {
    /// Create a new account status service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account. It starts `inactive` with no status timestamps.
    pub async fn create_account(&self, input: CreateAccountInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let id = self.id_gen.generate();
        let user = self
            .user_repo
            .create(user::ActiveModel::new_account(
                id,
                &input.email,
                input.user_name,
            ))
            .await?;

        tracing::info!(user_id = %user.id, status = %user.status, "Account created");
        Ok(user)
    }

    /// Find an account by ID.
    pub async fn find(&self, user_id: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_id(user_id).await
    }

    /// Get an account by ID, returning an error if not found.
    pub async fn get(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Soft-delete an account: `deleted`, stamps `deleted_at`, keeps the row.
    pub async fn soft_delete(&self, user_id: &str) -> AppResult<user::Model> {
        self.change_status(user_id, StatusChange::SoftDelete).await
    }

    /// Use in place of a destructive delete. Same effect as [`soft_delete`](Self::soft_delete).
    pub async fn soft_destroy(&self, user_id: &str) -> AppResult<user::Model> {
        self.soft_delete(user_id).await
    }

    /// Ban an account.
    pub async fn ban_user(&self, user_id: &str) -> AppResult<user::Model> {
        self.change_status(user_id, StatusChange::Ban).await
    }

    /// Suspend an account.
    pub async fn suspend_user(&self, user_id: &str) -> AppResult<user::Model> {
        self.change_status(user_id, StatusChange::Suspend).await
    }

    /// Activate an account without touching any status timestamp.
    pub async fn activate_user(&self, user_id: &str) -> AppResult<user::Model> {
        self.change_status(user_id, StatusChange::Activate).await
    }

    /// Activate an account and clear all status timestamps.
    pub async fn reactivate(&self, user_id: &str) -> AppResult<user::Model> {
        self.change_status(user_id, StatusChange::Reactivate).await
    }

    /// Load an account and apply `change` to it.
    pub async fn change_status(
        &self,
        user_id: &str,
        change: StatusChange,
    ) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        self.apply_change(user, change).await
    }

    /// Apply `change` to an already loaded account and persist it.
    ///
    /// On error nothing was written and `user` should be treated as stale.
    pub async fn apply_change(
        &self,
        user: user::Model,
        change: StatusChange,
    ) -> AppResult<user::Model> {
        let from = user.status;
        let mut active: user::ActiveModel = user.into();
        change.apply(&mut active, Utc::now().into());

        let updated = self.user_repo.update(active).await?;

        tracing::info!(
            user_id = %updated.id,
            from = %from,
            to = %updated.status,
            "Account status changed"
        );
        Ok(updated)
    }

    /// Permanently remove an account without running removal hooks.
    ///
    /// Irreversible. Unknown IDs are ignored.
    pub async fn hard_delete(&self, user_id: &str) -> AppResult<()> {
        self.user_repo.hard_delete(user_id).await?;
        tracing::warn!(user_id = user_id, "Account hard deleted");
        Ok(())
    }

    /// Permanently remove an account, running the repository's removal hooks.
    ///
    /// Irreversible. Unknown IDs are ignored.
    pub async fn hard_destroy(&self, user_id: &str) -> AppResult<()> {
        self.user_repo.hard_destroy(user_id).await?;
        tracing::warn!(
            user_id = user_id,
            hooks = self.user_repo.hooks().len(),
            "Account hard destroyed"
        );
        Ok(())
    }

    /// List accounts in `status`, newest first.
    pub async fn list_by_status(
        &self,
        status: AccountStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_by_status(status, limit, offset).await
    }

    /// Count accounts in `status`.
    pub async fn count_by_status(&self, status: AccountStatus) -> AppResult<u64> {
        self.user_repo.count_by_status(status).await
    }

    /// Count accounts in every status, in declaration order.
    pub async fn status_counts(&self) -> AppResult<Vec<(AccountStatus, u64)>> {
        let mut counts = Vec::new();
        for status in AccountStatus::iter() {
            counts.push((status, self.user_repo.count_by_status(status).await?));
        }
        Ok(counts)
    }
}
