use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{MailMessage, Mailer};

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Mailer backed by the SendGrid v3 mail-send API.
pub struct SendGridMailer {
    http: Client,
    api_key: String,
}

impl SendGridMailer {
    pub fn new(api_key: String) -> Self {
        SendGridMailer {
            http: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: MailMessage) -> Result<()> {
        let to: Vec<_> = message
            .to
            .iter()
            .map(|addr| json!({ "email": addr }))
            .collect();

        let payload = json!({
            "personalizations": [{ "to": to }],
            "from": { "email": message.from },
            "subject": message.subject,
            "content": [{ "type": "text/plain", "value": message.body }],
        });

        let resp = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to reach the mail transport")?;

        resp.error_for_status()
            .context("Mail transport rejected the message")?;

        Ok(())
    }
}
