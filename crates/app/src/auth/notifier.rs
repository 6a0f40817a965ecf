//! Verification code delivery.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

/// Delivers email verification codes to users.
#[automock]
#[async_trait]
pub trait VerificationNotifier: Send + Sync {
    /// Send `code` to `email`.
    async fn send_verification_code(&self, email: &str, code: &str);
}

/// Notifier that writes codes to the log, for development setups without a mailer.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl VerificationNotifier for LoggingNotifier {
    async fn send_verification_code(&self, email: &str, code: &str) {
        info!(email, code, "email verification code issued");
    }
}
