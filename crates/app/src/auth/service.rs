//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    auth::{
        AuthServiceError, Credentials, IssuedSession, NewSession, PasswordChange, Principal,
        Profile, ProfileUpdate, Role, SessionTokenVersion, SessionUuid, Signup, UserUuid,
        ValidationError, VerificationNotifier, format_session_token, generate_session_secret,
        generate_verification_code, hash_password, parse_session_token,
        repository::PgAuthRepository, session_verifier, validate_email, validate_full_name,
        validate_password, verification_code_hash, verify_password,
    },
    database::Db,
};

/// Session and verification code lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    pub session_ttl: SignedDuration,
    pub verification_ttl: SignedDuration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl: SignedDuration::from_hours(24 * 30),
            verification_ttl: SignedDuration::from_mins(30),
        }
    }
}

#[derive(Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
    notifier: Arc<dyn VerificationNotifier>,
    settings: AuthSettings,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn VerificationNotifier>, settings: AuthSettings) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
            notifier,
            settings,
        }
    }

    async fn issue_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile: Profile,
    ) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid.into_uuid(), version, &secret);

        let token_hash =
            session_verifier(&session_uuid.into_uuid(), version, &profile.uuid, &secret);

        let expires_at = Timestamp::now()
            .checked_add(self.settings.session_ttl)
            .unwrap_or(Timestamp::MAX);

        self.repository
            .create_session(
                tx,
                &NewSession {
                    uuid: session_uuid,
                    user_uuid: profile.uuid,
                    version,
                    token_hash,
                    expires_at,
                },
            )
            .await?;

        Ok(IssuedSession {
            token,
            expires_at,
            profile,
        })
    }

    async fn issue_verification_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<String, AuthServiceError> {
        let code = generate_verification_code();

        let expires_at = Timestamp::now()
            .checked_add(self.settings.verification_ttl)
            .unwrap_or(Timestamp::MAX);

        self.repository
            .create_email_verification(tx, user, &verification_code_hash(&code), expires_at)
            .await?;

        Ok(code)
    }

    async fn resolve_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bearer_token: &str,
    ) -> Result<(SessionUuid, Principal), AuthServiceError> {
        let parsed =
            parse_session_token(bearer_token).map_err(|_invalid| AuthServiceError::NotFound)?;

        let session = self
            .repository
            .find_active_session(tx, parsed.session_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let expected = session_verifier(
            &parsed.session_uuid,
            parsed.version,
            &session.user_uuid,
            &parsed.secret,
        );

        if expected != session.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        Ok((
            session.uuid,
            Principal {
                user: session.user_uuid,
                role: session.role,
            },
        ))
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(
        name = "auth.service.signup",
        skip(self, signup),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn signup(&self, signup: Signup) -> Result<IssuedSession, AuthServiceError> {
        let email = validate_email(&signup.email)?;
        validate_password("password", &signup.password)?;
        let full_name = validate_full_name(&signup.full_name)?;

        let password_hash = hash_password(&signup.password)?;

        let mut tx = self.db.begin().await?;

        let profile = self
            .repository
            .create_profile(&mut tx, UserUuid::new(), &email, &password_hash, &full_name)
            .await?;

        Span::current().record("user_uuid", tracing::field::display(profile.uuid));

        let code = self.issue_verification_code(&mut tx, profile.uuid).await?;
        let issued = self.issue_session(&mut tx, profile).await?;

        tx.commit().await?;

        self.notifier
            .send_verification_code(&issued.profile.email, &code)
            .await;

        info!(user_uuid = %issued.profile.uuid, "signed up new customer");

        Ok(issued)
    }

    #[tracing::instrument(
        name = "auth.service.login",
        skip(self, credentials),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError> {
        let email = credentials.email.trim().to_lowercase();

        let mut tx = self.db.begin().await?;

        let Some(found) = self
            .repository
            .find_profile_by_email(&mut tx, &email)
            .await?
        else {
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(&credentials.password, &found.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Span::current().record("user_uuid", tracing::field::display(found.profile.uuid));

        let issued = self.issue_session(&mut tx, found.profile).await?;

        tx.commit().await?;

        Ok(issued)
    }

    #[tracing::instrument(name = "auth.service.logout", skip(self, bearer_token), err)]
    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let (session, _principal) = self.resolve_session(&mut tx, bearer_token).await?;

        self.repository.revoke_session(&mut tx, session).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let (session, principal) = self.resolve_session(&mut tx, bearer_token).await?;

        if let Err(error) = self.repository.touch_session(&mut tx, session).await {
            warn!("failed to record session use: {error}");
        }

        tx.commit().await?;

        Ok(principal)
    }

    #[tracing::instrument(
        name = "auth.service.get_profile",
        skip(self),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn get_profile(&self, principal: Principal) -> Result<Profile, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_profile(&mut tx, principal.user).await?;

        tx.commit().await?;

        Ok(found.profile)
    }

    #[tracing::instrument(
        name = "auth.service.update_profile",
        skip(self, update),
        fields(user_uuid = %principal.user),
        err
    )]
    async fn update_profile(
        &self,
        principal: Principal,
        update: ProfileUpdate,
    ) -> Result<Profile, AuthServiceError> {
        let full_name = update
            .full_name
            .as_deref()
            .map(validate_full_name)
            .transpose()?;

        let phone = update.phone.as_deref().map(str::trim);

        let mut tx = self.db.begin().await?;

        let profile = self
            .repository
            .update_profile(&mut tx, principal.user, full_name.as_deref(), phone)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }

    #[tracing::instrument(
        name = "auth.service.update_password",
        skip(self, bearer_token, change),
        fields(revoked_sessions = tracing::field::Empty),
        err
    )]
    async fn update_password(
        &self,
        bearer_token: &str,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError> {
        validate_password("new_password", &change.new_password)?;

        let mut tx = self.db.begin().await?;

        let (session, principal) = self.resolve_session(&mut tx, bearer_token).await?;

        let found = self.repository.get_profile(&mut tx, principal.user).await?;

        if !verify_password(&change.current_password, &found.password_hash) {
            return Err(
                ValidationError::new("current_password", "Current password is incorrect").into(),
            );
        }

        let password_hash = hash_password(&change.new_password)?;

        self.repository
            .update_password(&mut tx, principal.user, &password_hash)
            .await?;

        let revoked = self
            .repository
            .revoke_other_sessions(&mut tx, principal.user, session)
            .await?;

        Span::current().record("revoked_sessions", revoked);

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(name = "auth.service.verify_email", skip(self, email, code), err)]
    async fn verify_email(&self, email: &str, code: &str) -> Result<Profile, AuthServiceError> {
        let email = validate_email(email)?;

        let mut tx = self.db.begin().await?;

        let Some(found) = self
            .repository
            .find_profile_by_email(&mut tx, &email)
            .await?
        else {
            return Err(AuthServiceError::InvalidVerificationCode);
        };

        let consumed = self
            .repository
            .consume_email_verification(&mut tx, found.profile.uuid, &verification_code_hash(code))
            .await?;

        if !consumed {
            return Err(AuthServiceError::InvalidVerificationCode);
        }

        let profile = self
            .repository
            .mark_email_verified(&mut tx, found.profile.uuid)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }

    #[tracing::instrument(name = "auth.service.set_role", skip(self, email, role), fields(role = %role), err)]
    async fn set_role(&self, email: &str, role: Role) -> Result<Profile, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let profile = self
            .repository
            .set_role(&mut tx, email.trim(), role)
            .await?;

        tx.commit().await?;

        info!(user_uuid = %profile.uuid, role = %profile.role, "changed profile role");

        Ok(profile)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a customer account, send a verification code and open a session.
    async fn signup(&self, signup: Signup) -> Result<IssuedSession, AuthServiceError>;

    /// Open a session for valid credentials.
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError>;

    /// Revoke the presented session.
    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError>;

    /// Resolve a bearer token into the acting principal.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;

    /// The principal's own profile.
    async fn get_profile(&self, principal: Principal) -> Result<Profile, AuthServiceError>;

    /// Update name and phone.
    async fn update_profile(
        &self,
        principal: Principal,
        update: ProfileUpdate,
    ) -> Result<Profile, AuthServiceError>;

    /// Change the password and revoke every other session of the user.
    async fn update_password(
        &self,
        bearer_token: &str,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError>;

    /// Consume a verification code and mark the email verified.
    async fn verify_email(&self, email: &str, code: &str) -> Result<Profile, AuthServiceError>;

    /// Promote or demote an account.
    async fn set_role(&self, email: &str, role: Role) -> Result<Profile, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use testresult::TestResult;

    use crate::{auth::MockVerificationNotifier, test::TestContext};

    use super::*;

    fn signup(email: &str) -> Signup {
        Signup {
            email: email.to_string(),
            password: "correct horse".to_string(),
            full_name: "Ada Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn signup_rejects_short_password_before_touching_storage() -> TestResult {
        let pool = sqlx::PgPool::connect_lazy("postgres://storefront@localhost/unused")?;

        let mut notifier = MockVerificationNotifier::new();

        notifier.expect_send_verification_code().never();

        let service =
            PgAuthService::new(Db::new(pool), Arc::new(notifier), AuthSettings::default());

        let result = service
            .signup(Signup {
                password: "short".to_string(),
                ..signup("ada@example.com")
            })
            .await;

        assert!(
            matches!(
                result,
                Err(AuthServiceError::Validation(ValidationError {
                    field: "password",
                    ..
                }))
            ),
            "expected password validation error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn signup_then_authenticate_resolves_customer() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.signup(signup("grace@example.com")).await?;

        assert_eq!(issued.profile.role, Role::Customer);
        assert!(issued.profile.email_verified_at.is_none());

        let principal = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(principal, Principal::customer(issued.profile.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.signup(signup("dup@example.com")).await?;

        let result = ctx.auth.signup(signup("DUP@example.com")).await;

        assert!(
            matches!(result, Err(AuthServiceError::EmailTaken)),
            "expected EmailTaken, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.signup(signup("linus@example.com")).await?;

        let result = ctx
            .auth
            .login(Credentials {
                email: "linus@example.com".to_string(),
                password: "not the password".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn logout_revokes_session() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.signup(signup("ken@example.com")).await?;

        ctx.auth.logout(&issued.token).await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound after logout, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn password_change_revokes_other_sessions() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx.auth.signup(signup("barbara@example.com")).await?;

        let second = ctx
            .auth
            .login(Credentials {
                email: "barbara@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await?;

        ctx.auth
            .update_password(
                &second.token,
                PasswordChange {
                    current_password: "correct horse".to_string(),
                    new_password: "battery staple".to_string(),
                },
            )
            .await?;

        assert!(ctx.auth.authenticate_bearer(&second.token).await.is_ok());
        assert!(ctx.auth.authenticate_bearer(&first.token).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn verification_code_marks_email_verified_once() -> TestResult {
        let sent = Arc::new(Mutex::new(None::<String>));
        let captured = Arc::clone(&sent);

        let mut notifier = MockVerificationNotifier::new();

        notifier
            .expect_send_verification_code()
            .once()
            .returning(move |_, code| {
                if let Ok(mut slot) = captured.lock() {
                    *slot = Some(code.to_string());
                }
            });

        let ctx = TestContext::with_notifier(Arc::new(notifier)).await;

        ctx.auth.signup(signup("margaret@example.com")).await?;

        let code = sent
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or("no code sent")?;

        let profile = ctx.auth.verify_email("margaret@example.com", &code).await?;

        assert!(profile.email_verified_at.is_some());

        let again = ctx.auth.verify_email("margaret@example.com", &code).await;

        assert!(
            matches!(again, Err(AuthServiceError::InvalidVerificationCode)),
            "codes are single use, got {again:?}"
        );

        Ok(())
    }
}
