//! SMTP delivery.
//!
//! All outbound mail goes through the `Notifier` trait, so the
//! scheduler can be exercised without a network. The production
//! implementation authenticates as the configured sender and sends
//! over STARTTLS.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, message::Mailbox,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};

use tedtrack_core::config::MailConfig;
use tedtrack_core::error::{Result, TedTrackError};

/// Subject line shape shared by every notification.
pub fn subject_line(label: &str) -> String {
    format!("TED {label}: Aviso de prazo!")
}

/// Outbound notification delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one HTML notification. `label` names the deadline column
    /// (or lifecycle event) the notification is about.
    async fn notify(&self, label: &str, html_body: &str) -> Result<()>;
}

/// Production notifier: authenticated SMTP via STARTTLS.
pub struct SmtpNotifier {
    mail: MailConfig,
}

impl SmtpNotifier {
    pub fn new(mail: MailConfig) -> Self {
        Self { mail }
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, label: &str, html_body: &str) -> Result<()> {
        let from: Mailbox = self
            .mail
            .sender
            .parse()
            .map_err(|e| TedTrackError::Transport(format!("Invalid sender: {e}")))?;
        let to: Mailbox = self
            .mail
            .recipient
            .parse()
            .map_err(|e| TedTrackError::Transport(format!("Invalid recipient: {e}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject_line(label))
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| TedTrackError::Transport(format!("Build email: {e}")))?;

        let creds = Credentials::new(self.mail.sender.clone(), self.mail.password.clone());

        let mailer =
            AsyncSmtpTransport::<lettre::Tokio1Executor>::starttls_relay(&self.mail.smtp_host)
                .map_err(|e| TedTrackError::Transport(format!("SMTP relay: {e}")))?
                .port(self.mail.smtp_port)
                .credentials(creds)
                .build();

        mailer
            .send(email)
            .await
            .map_err(|e| TedTrackError::Transport(format!("SMTP send: {e}")))?;

        tracing::info!("📤 Notification sent to: {}", self.mail.recipient);
        Ok(())
    }
}

/// Dry-run notifier: logs the notification instead of sending it.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, label: &str, html_body: &str) -> Result<()> {
        tracing::info!(
            "📢 [dry-run] {} ({} bytes)",
            subject_line(label),
            html_body.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_line() {
        assert_eq!(
            subject_line("Data para alerta"),
            "TED Data para alerta: Aviso de prazo!"
        );
        assert_eq!(
            subject_line("Tarefa encerrada"),
            "TED Tarefa encerrada: Aviso de prazo!"
        );
    }

    #[tokio::test]
    async fn test_invalid_sender_rejected_before_send() {
        let mail = MailConfig {
            sender: "not an address".into(),
            ..MailConfig::default()
        };
        let notifier = SmtpNotifier::new(mail);
        let err = notifier.notify("Vigência fim", "<p>x</p>").await.unwrap_err();
        assert!(err.to_string().contains("Invalid sender"));
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier;
        assert!(notifier.notify("Vigência fim", "<p>x</p>").await.is_ok());
    }
}
