//! Auth data models.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{auth::SessionTokenVersion, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<Profile>;

/// Session UUID
pub type SessionUuid = TypedUuid<ActiveSession>;

/// Account role stored on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated user and role acting on one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user: UserUuid,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn customer(user: UserUuid) -> Self {
        Self {
            user,
            role: Role::Customer,
        }
    }

    #[must_use]
    pub const fn admin(user: UserUuid) -> Self {
        Self {
            user,
            role: Role::Admin,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// A user's account profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub uuid: UserUuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub email_verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Password change payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// A freshly issued session with its one-time raw token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: Timestamp,
    pub profile: Profile,
}

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub role: Role,
    pub version: SessionTokenVersion,
    pub token_hash: String,
}

/// Session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Profile row including its password hash; never leaves the auth module.
#[derive(Debug, Clone)]
pub(crate) struct ProfileCredentials {
    pub profile: Profile,
    pub password_hash: String,
}
