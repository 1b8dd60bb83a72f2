mod email;

pub use email::EmailProvider;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::config::smtp::SmtpConfig;

/// Notification message to send
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Result of sending a notification
#[derive(Debug)]
pub struct SendResult {
    pub success: bool,
    pub error: Option<String>,
}

/// Trait for notification providers
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> SendResult;
}

/// Notification service owning the optional email channel.
///
/// Sends are best-effort throughout: an unconfigured or failing channel
/// returns an unsuccessful `SendResult`, never an error.
#[derive(Clone)]
pub struct NotificationService {
    email: Arc<RwLock<Option<EmailProvider>>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            email: Arc::new(RwLock::new(None)),
        }
    }

    /// Service with no channels configured; sends become logged no-ops.
    pub fn disabled() -> Self {
        Self::new()
    }

    /// Initialize the email provider from SMTP settings
    pub async fn init_from_config(&self, config: &SmtpConfig) {
        if !config.is_configured() {
            tracing::info!("SMTP not configured, credential emails disabled");
            return;
        }

        match EmailProvider::from_config(config) {
            Ok(provider) => {
                let mut email_lock = self.email.write().await;
                *email_lock = Some(provider);
                tracing::info!("Email notification provider initialized");
            }
            Err(e) => {
                tracing::warn!("Failed to initialize email provider: {}", e);
            }
        }
    }

    /// Send login credentials to a newly approved student.
    pub async fn send_credentials(
        &self,
        to_email: &str,
        temp_password: &str,
        display_name: &str,
    ) -> SendResult {
        let message = NotificationMessage {
            recipient: to_email.to_string(),
            subject: "Your Student Portal Credentials".to_string(),
            body: format!(
                "Hello {},\n\n\
                 Your student registration has been approved and your online \
                 account has been created.\n\n\
                 Login Details\n\
                 Email: {}\n\
                 Temporary Password: {}\n\n\
                 Please log in immediately and change your password.\n\n\
                 — The Registrar Team",
                display_name, to_email, temp_password
            ),
        };

        let email_lock = self.email.read().await;
        match email_lock.as_ref() {
            Some(provider) => provider.send(&message).await,
            None => {
                tracing::info!(recipient = to_email, "email channel not configured, skipping credentials send");
                SendResult {
                    success: false,
                    error: Some("Email notifications not configured".to_string()),
                }
            }
        }
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}
