//! Email delivery for sign-in links.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use studyhub_common::{AppError, AppResult, config::MailConfig};

/// Email service sending magic-link mail over SMTP.
///
/// When SMTP is unconfigured the link is logged instead, which keeps local
/// development working without a mail relay.
#[derive(Clone)]
pub struct EmailService {
    config: MailConfig,
}

impl EmailService {
    /// Create a new email service.
    #[must_use]
    pub const fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Whether an SMTP relay is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.smtp_host.is_some()
    }

    /// Send a magic sign-in link to `to`.
    pub async fn send_magic_link(&self, to: &str, link: &str) -> AppResult<()> {
        let Some(host) = self.config.smtp_host.as_deref() else {
            tracing::info!(to = %to, link = %link, "SMTP not configured, logging sign-in link");
            return Ok(());
        };

        let (subject, body) = render_magic_link(link);

        let message = Message::builder()
            .from(parse_mailbox(&self.config.from)?)
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::Mail(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Mail(e.to_string()))?
            .port(self.config.smtp_port);

        if let (Some(username), Some(password)) = (
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        ) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        builder
            .build()
            .send(message)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        tracing::debug!(to = %to, "Sign-in link email sent");
        Ok(())
    }
}

fn parse_mailbox(addr: &str) -> AppResult<Mailbox> {
    addr.parse()
        .map_err(|_| AppError::Mail(format!("Invalid email address: {addr}")))
}

fn render_magic_link(link: &str) -> (String, String) {
    let subject = "Your studyhub sign-in link".to_string();
    let body = format!(
        "Use the link below to sign in. It works once and expires shortly.\n\n\
        {link}\n\n\
        If you did not request this, you can ignore this email."
    );
    (subject, body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_link() {
        let (subject, body) = render_magic_link("https://studyhub.example/auth/verify?token=abc");
        assert!(subject.contains("sign-in"));
        assert!(body.contains("https://studyhub.example/auth/verify?token=abc"));
    }

    #[test]
    fn test_parse_mailbox_rejects_garbage() {
        assert!(parse_mailbox("not an address").is_err());
        assert!(parse_mailbox("alice@students.example.edu").is_ok());
    }

    #[tokio::test]
    async fn test_unconfigured_send_logs_and_succeeds() {
        let service = EmailService::new(MailConfig::default());
        assert!(!service.is_enabled());
        service
            .send_magic_link("alice@students.example.edu", "https://example/link")
            .await
            .unwrap();
    }
}
