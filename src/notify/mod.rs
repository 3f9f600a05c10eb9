pub mod sendgrid;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, trace, warn};

use crate::config::Settings;

pub use sendgrid::SendGridMailer;

/// A composed plain-text notification ready for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Transport seam for outbound mail. Delivery is fire-and-forget: no
/// confirmation, no retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<()>;
}

/// Compose and send the report email.
///
/// A blank or absent recipient list makes this a silent no-op. The body is
/// the report lines joined by newlines. Transport failures propagate unless
/// `mail_best_effort` is set, in which case they are downgraded to a warning.
pub async fn send_report(
    mailer: &dyn Mailer,
    settings: &Settings,
    subject: &str,
    lines: &[String],
) -> Result<()> {
    let recipients = settings.recipients();
    if recipients.is_empty() {
        trace!("No recipients configured, skipping notification");
        return Ok(());
    }

    let from = settings
        .email_from
        .as_deref()
        .context("EMAIL_FROM must be set when EMAIL_TO is configured")?;

    let message = MailMessage {
        from: from.to_string(),
        to: recipients.iter().map(|r| r.to_string()).collect(),
        subject: subject.to_string(),
        body: lines.join("\n"),
    };

    info!("Sending notification to: {}", message.to.join(" "));
    trace!("Message contents:\n{}", message.body);

    match mailer.send(message).await {
        Ok(()) => Ok(()),
        Err(err) if settings.mail_best_effort => {
            warn!("Notification transport failed (best-effort): {err:#}");
            Ok(())
        }
        Err(err) => Err(err.context("Failed to send notification email")),
    }
}
