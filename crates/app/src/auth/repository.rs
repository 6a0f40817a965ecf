//! Auth repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::auth::{
    ActiveSession, NewSession, Profile, ProfileCredentials, Role, SessionTokenVersion, SessionUuid,
    UserUuid,
};

const CREATE_PROFILE_SQL: &str = include_str!("sql/create_profile.sql");
const FIND_PROFILE_BY_EMAIL_SQL: &str = include_str!("sql/find_profile_by_email.sql");
const GET_PROFILE_SQL: &str = include_str!("sql/get_profile.sql");
const UPDATE_PROFILE_SQL: &str = include_str!("sql/update_profile.sql");
const UPDATE_PASSWORD_SQL: &str = include_str!("sql/update_password.sql");
const SET_ROLE_SQL: &str = include_str!("sql/set_role.sql");
const MARK_EMAIL_VERIFIED_SQL: &str = include_str!("sql/mark_email_verified.sql");
const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const FIND_ACTIVE_SESSION_SQL: &str = include_str!("sql/find_active_session.sql");
const TOUCH_SESSION_SQL: &str = include_str!("sql/touch_session.sql");
const REVOKE_SESSION_SQL: &str = include_str!("sql/revoke_session.sql");
const REVOKE_OTHER_SESSIONS_SQL: &str = include_str!("sql/revoke_other_sessions.sql");
const CREATE_EMAIL_VERIFICATION_SQL: &str = include_str!("sql/create_email_verification.sql");
const CONSUME_EMAIL_VERIFICATION_SQL: &str = include_str!("sql/consume_email_verification.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAuthRepository;

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: UserUuid,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<Profile, sqlx::Error> {
        query_as::<Postgres, Profile>(CREATE_PROFILE_SQL)
            .bind(uuid.into_uuid())
            .bind(email)
            .bind(password_hash)
            .bind(full_name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_profile_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<ProfileCredentials>, sqlx::Error> {
        query_as::<Postgres, ProfileCredentials>(FIND_PROFILE_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<ProfileCredentials, sqlx::Error> {
        query_as::<Postgres, ProfileCredentials>(GET_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Profile, sqlx::Error> {
        query_as::<Postgres, Profile>(UPDATE_PROFILE_SQL)
            .bind(user.into_uuid())
            .bind(full_name)
            .bind(phone)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PASSWORD_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        role: Role,
    ) -> Result<Profile, sqlx::Error> {
        query_as::<Postgres, Profile>(SET_ROLE_SQL)
            .bind(email)
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_email_verified(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Profile, sqlx::Error> {
        query_as::<Postgres, Profile>(MARK_EMAIL_VERIFIED_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: &NewSession,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_SESSION_SQL)
            .bind(session.uuid.into_uuid())
            .bind(session.user_uuid.into_uuid())
            .bind(session.version.as_i16())
            .bind(&session.token_hash)
            .bind(SqlxTimestamp::from(session.expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_active_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: Uuid,
        version: SessionTokenVersion,
    ) -> Result<Option<ActiveSession>, sqlx::Error> {
        query_as::<Postgres, ActiveSession>(FIND_ACTIVE_SESSION_SQL)
            .bind(session)
            .bind(version.as_i16())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn touch_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: SessionUuid,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_SESSION_SQL)
            .bind(session.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn revoke_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: SessionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_SESSION_SQL)
            .bind(session.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn revoke_other_sessions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        keep: SessionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_OTHER_SESSIONS_SQL)
            .bind(user.into_uuid())
            .bind(keep.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn create_email_verification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_EMAIL_VERIFICATION_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .bind(code_hash)
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn consume_email_verification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        code_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let consumed = query_scalar::<_, Uuid>(CONSUME_EMAIL_VERIFICATION_SQL)
            .bind(user.into_uuid())
            .bind(code_hash)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(consumed.is_some())
    }
}

fn try_get_role(row: &PgRow) -> Result<Role, sqlx::Error> {
    let role: String = row.try_get("role")?;

    role.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "role".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Profile {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            role: try_get_role(row)?,
            email_verified_at: row
                .try_get::<Option<SqlxTimestamp>, _>("email_verified_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProfileCredentials {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            profile: Profile::from_row(row)?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ActiveSession {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let version: i16 = row.try_get("version")?;

        Ok(Self {
            uuid: SessionUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            role: try_get_role(row)?,
            version: SessionTokenVersion::try_from(version).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "version".to_string(),
                    source: Box::new(e),
                }
            })?,
            token_hash: row.try_get("token_hash")?,
        })
    }
}
