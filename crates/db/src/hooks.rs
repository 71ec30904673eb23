//! Removal hooks for permanent account deletion.
//!
//! Hooks run inside the transaction that removes the `user` row, so any cleanup they
//! perform commits or rolls back together with the removal.

use std::fmt;
use std::sync::Arc;

use accounts_common::{AppError, AppResult};
use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::entities::user;

/// Side effect attached to [`UserRepository::hard_destroy`](crate::repositories::UserRepository::hard_destroy).
///
/// Returning an error from either method aborts the removal and rolls back the
/// transaction.
#[async_trait]
pub trait RemovalHook: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Called before the row is deleted.
    async fn before_remove(&self, _txn: &DatabaseTransaction, _user: &user::Model) -> AppResult<()> {
        Ok(())
    }

    /// Called after the row is deleted, before commit.
    async fn after_remove(&self, _txn: &DatabaseTransaction, _user: &user::Model) -> AppResult<()> {
        Ok(())
    }
}

/// Ordered list of removal hooks.
#[derive(Clone, Default)]
pub struct RemovalHooks {
    hooks: Vec<Arc<dyn RemovalHook>>,
}

impl RemovalHooks {
    /// Create an empty hook list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook. Hooks run in registration order.
    pub fn register(&mut self, hook: Arc<dyn RemovalHook>) {
        self.hooks.push(hook);
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, hook: Arc<dyn RemovalHook>) -> Self {
        self.register(hook);
        self
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) async fn run_before(
        &self,
        txn: &DatabaseTransaction,
        user: &user::Model,
    ) -> AppResult<()> {
        for hook in &self.hooks {
            tracing::debug!(hook = hook.name(), user_id = %user.id, "Running before_remove hook");
            hook.before_remove(txn, user)
                .await
                .map_err(|e| hook_error(hook.as_ref(), e))?;
        }
        Ok(())
    }

    pub(crate) async fn run_after(
        &self,
        txn: &DatabaseTransaction,
        user: &user::Model,
    ) -> AppResult<()> {
        for hook in &self.hooks {
            tracing::debug!(hook = hook.name(), user_id = %user.id, "Running after_remove hook");
            hook.after_remove(txn, user)
                .await
                .map_err(|e| hook_error(hook.as_ref(), e))?;
        }
        Ok(())
    }
}

impl fmt::Debug for RemovalHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| h.name()))
            .finish()
    }
}

fn hook_error(hook: &dyn RemovalHook, err: AppError) -> AppError {
    match err {
        AppError::Hook { .. } => err,
        other => AppError::Hook {
            hook: hook.name(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl RemovalHook for Named {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn test_register_keeps_order() {
        let hooks = RemovalHooks::new()
            .with(Arc::new(Named("sessions")))
            .with(Arc::new(Named("uploads")));

        assert_eq!(hooks.len(), 2);
        assert_eq!(format!("{hooks:?}"), r#"["sessions", "uploads"]"#);
    }

    #[test]
    fn test_empty() {
        assert!(RemovalHooks::new().is_empty());
    }

    #[test]
    fn test_hook_error_wraps_once() {
        let hook = Named("sessions");
        let wrapped = hook_error(&hook, AppError::Database("gone".to_string()));
        assert!(matches!(
            &wrapped,
            AppError::Hook { hook: "sessions", message } if message == "Database error: gone"
        ));

        let rewrapped = hook_error(&Named("uploads"), wrapped);
        assert!(matches!(rewrapped, AppError::Hook { hook: "sessions", .. }));
    }
}
