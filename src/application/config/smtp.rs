use std::env;

/// SMTP settings for outbound credential emails.
///
/// The notification service stays disabled (sends become logged no-ops)
/// unless host, username and password are all present.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub from_name: String,
    pub use_tls: bool,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        let username = env::var("REGISTRAR_SMTP_USERNAME").ok();
        let from_address = env::var("REGISTRAR_SMTP_FROM")
            .ok()
            .or_else(|| username.clone())
            .unwrap_or_else(|| "noreply@localhost".to_string());

        Self {
            host: env::var("REGISTRAR_SMTP_HOST").ok(),
            port: env::var("REGISTRAR_SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username,
            password: env::var("REGISTRAR_SMTP_PASSWORD").ok(),
            from_address,
            from_name: env::var("REGISTRAR_SMTP_FROM_NAME")
                .unwrap_or_else(|_| "Registrar".to_string()),
            use_tls: env::var("REGISTRAR_SMTP_USE_TLS")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.username.is_some() && self.password.is_some()
    }
}
