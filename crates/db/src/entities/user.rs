//! User entity.
//!
//! The credential, confirmation, lockout and sign-in tracking columns belong to the
//! authentication layer. This crate only reads and writes `status` and the three
//! status timestamps.

use std::fmt;
use std::str::FromStr;

use accounts_common::AppError;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an account.
///
/// Stored as an integer; the discriminants are part of the schema.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Registered but not yet activated.
    #[default]
    #[sea_orm(num_value = 0)]
    Inactive,
    /// In good standing.
    #[sea_orm(num_value = 1)]
    Active,
    /// Banned by a moderator.
    #[sea_orm(num_value = 2)]
    Banned,
    /// Soft-deleted; the row is kept.
    #[sea_orm(num_value = 3)]
    Deleted,
    /// Temporarily suspended.
    #[sea_orm(num_value = 4)]
    Suspended,
}

impl AccountStatus {
    /// Lower-case name as used in logs and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Banned => "banned",
            Self::Deleted => "deleted",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inactive" => Ok(Self::Inactive),
            "active" => Ok(Self::Active),
            "banned" => Ok(Self::Banned),
            "deleted" => Ok(Self::Deleted),
            "suspended" => Ok(Self::Suspended),
            other => Err(AppError::BadRequest(format!(
                "Unknown account status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub email: String,

    /// Lower-cased email, unique.
    #[sea_orm(unique)]
    pub email_lower: String,

    #[sea_orm(nullable)]
    pub user_name: Option<String>,

    // --- authentication layer ---
    pub encrypted_password: String,

    #[sea_orm(unique, nullable)]
    pub reset_password_token: Option<String>,

    #[sea_orm(nullable)]
    pub reset_password_sent_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub remember_created_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(default_value = 0)]
    pub sign_in_count: i32,

    #[sea_orm(nullable)]
    pub current_sign_in_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub last_sign_in_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub current_sign_in_ip: Option<String>,

    #[sea_orm(nullable)]
    pub last_sign_in_ip: Option<String>,

    #[sea_orm(unique, nullable)]
    pub confirmation_token: Option<String>,

    #[sea_orm(nullable)]
    pub confirmed_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub confirmation_sent_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub unconfirmed_email: Option<String>,

    #[sea_orm(default_value = 0)]
    pub failed_attempts: i32,

    #[sea_orm(unique, nullable)]
    pub unlock_token: Option<String>,

    #[sea_orm(nullable)]
    pub locked_at: Option<DateTimeWithTimeZone>,

    // --- status lifecycle ---
    #[sea_orm(indexed)]
    pub status: AccountStatus,

    /// Set on soft deletion, cleared on reactivation.
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,

    /// Set on ban, cleared on reactivation.
    #[sea_orm(nullable)]
    pub banned_at: Option<DateTimeWithTimeZone>,

    /// Set on suspension, cleared on reactivation.
    #[sea_orm(nullable)]
    pub suspended_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Check if the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Check if the account is banned.
    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.status == AccountStatus::Banned
    }

    /// Check if the account is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.status == AccountStatus::Deleted
    }

    /// Check if the account is suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.status == AccountStatus::Suspended
    }

    /// Check if the account has not been activated.
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        self.status == AccountStatus::Inactive
    }
}

impl ActiveModel {
    /// Build an insertable record for a freshly registered account.
    ///
    /// The account starts `inactive` with no status timestamps. The password hash is
    /// left empty for the authentication layer to fill in.
    #[must_use]
    pub fn new_account(id: String, email: &str, user_name: Option<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Set(id),
            email: Set(email.to_string()),
            email_lower: Set(email.to_lowercase()),
            user_name: Set(user_name),
            encrypted_password: Set(String::new()),
            reset_password_token: Set(None),
            reset_password_sent_at: Set(None),
            remember_created_at: Set(None),
            sign_in_count: Set(0),
            current_sign_in_at: Set(None),
            last_sign_in_at: Set(None),
            current_sign_in_ip: Set(None),
            last_sign_in_ip: Set(None),
            confirmation_token: Set(None),
            confirmed_at: Set(None),
            confirmation_sent_at: Set(None),
            unconfirmed_email: Set(None),
            failed_attempts: Set(0),
            unlock_token: Set(None),
            locked_at: Set(None),
            status: Set(AccountStatus::default()),
            deleted_at: Set(None),
            banned_at: Set(None),
            suspended_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(None),
        }
    }
}
