use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{NotificationMessage, NotificationProvider, SendResult};
use crate::application::config::smtp::SmtpConfig;

pub struct EmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    from_name: String,
}

impl EmailProvider {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, String> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| "SMTP host not configured".to_string())?;
        let username = config
            .username
            .clone()
            .ok_or_else(|| "SMTP username not configured".to_string())?;
        let password = config
            .password
            .clone()
            .ok_or_else(|| "SMTP password not configured".to_string())?;

        let creds = Credentials::new(username, password);

        let transport = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
                .port(config.port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(config.port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
        })
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> SendResult {
        let from = format!("{} <{}>", self.from_name, self.from_address);

        let to_mailbox = match to.parse() {
            Ok(mbox) => mbox,
            Err(_) => {
                return SendResult {
                    success: false,
                    error: Some("Invalid recipient email address".to_string()),
                }
            }
        };

        let from_mailbox = match from.parse() {
            Ok(mbox) => mbox,
            Err(_) => match self.from_address.parse() {
                Ok(mbox) => mbox,
                Err(_) => {
                    return SendResult {
                        success: false,
                        error: Some("Invalid from email address".to_string()),
                    }
                }
            },
        };

        let email = match Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
        {
            Ok(email) => email,
            Err(e) => {
                return SendResult {
                    success: false,
                    error: Some(format!("Failed to build email: {}", e)),
                }
            }
        };

        match self.transport.send(email).await {
            Ok(_) => SendResult {
                success: true,
                error: None,
            },
            Err(e) => SendResult {
                success: false,
                error: Some(format!("Failed to send email: {}", e)),
            },
        }
    }
}

#[async_trait]
impl NotificationProvider for EmailProvider {
    async fn send(&self, message: &NotificationMessage) -> SendResult {
        self.send_email(&message.recipient, &message.subject, &message.body)
            .await
    }
}
