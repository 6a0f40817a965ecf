//! Auth Config

use clap::Args;
use jiff::SignedDuration;
use storefront_app::auth::AuthSettings;

/// Session and email verification settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Days a session token stays valid
    #[arg(long, env = "SESSION_TTL_DAYS", default_value_t = 30_u16)]
    pub session_ttl_days: u16,

    /// Minutes an email verification code stays valid
    #[arg(long, env = "VERIFICATION_CODE_TTL_MINUTES", default_value_t = 30_u16)]
    pub verification_code_ttl_minutes: u16,
}

impl AuthConfig {
    #[must_use]
    pub fn settings(&self) -> AuthSettings {
        AuthSettings {
            session_ttl: SignedDuration::from_hours(i64::from(self.session_ttl_days) * 24),
            verification_ttl: SignedDuration::from_mins(i64::from(
                self.verification_code_ttl_minutes,
            )),
        }
    }
}
