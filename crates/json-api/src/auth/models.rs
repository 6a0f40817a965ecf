//! Auth response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::auth::{IssuedSession, Profile};

/// Profile Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,

    /// `customer` or `admin`
    pub role: String,

    pub email_verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.uuid.into_uuid(),
            email: profile.email,
            full_name: profile.full_name,
            phone: profile.phone,
            role: profile.role.to_string(),
            email_verified_at: profile.email_verified_at.map(|at| at.to_string()),
            created_at: profile.created_at.to_string(),
            updated_at: profile.updated_at.to_string(),
        }
    }
}

/// Session Response
///
/// The token is only ever returned here; present it as `Authorization: Bearer <token>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    pub token: String,
    pub expires_at: String,
    pub user: ProfileResponse,
}

impl From<IssuedSession> for SessionResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at.to_string(),
            user: session.profile.into(),
        }
    }
}
