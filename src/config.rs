use anyhow::{Context, Result};

/// Runtime configuration resolved from the environment once per process.
///
/// S3 credentials and endpoint come from the ambient AWS configuration chain
/// and are not read here.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Destination bucket for extracted entries
    pub output_bucket: String,
    /// Key prefix under which extraction folders are created
    pub output_prefix: String,
    /// Whitespace-delimited recipient list; empty disables notification
    pub email_to: Option<String>,
    /// Sender address for notification email
    pub email_from: Option<String>,
    /// SendGrid API key for the mail transport
    pub sendgrid_api_key: Option<String>,
    /// Downgrade mail transport failures to a logged warning
    pub mail_best_effort: bool,
}

impl Settings {
    /// Resolve settings from environment variables.
    ///
    /// `EMAIL_FROM` and `SENDGRID_API_KEY` are only required when `EMAIL_TO`
    /// is set, since a blank recipient list disables notification entirely.
    pub fn from_env() -> Result<Self> {
        let output_bucket = require("OUTPUT_BUCKET")?;
        let output_prefix = require("OUTPUT_PREFIX")?;
        let email_to = optional("EMAIL_TO");

        let (email_from, sendgrid_api_key) = if email_to.is_some() {
            (Some(require("EMAIL_FROM")?), Some(require("SENDGRID_API_KEY")?))
        } else {
            (optional("EMAIL_FROM"), optional("SENDGRID_API_KEY"))
        };

        let mail_best_effort = optional("MAIL_BEST_EFFORT")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Settings {
            output_bucket,
            output_prefix,
            email_to,
            email_from,
            sendgrid_api_key,
            mail_best_effort,
        })
    }

    /// Recipient addresses parsed from the whitespace-delimited `EMAIL_TO` value.
    pub fn recipients(&self) -> Vec<&str> {
        self.email_to
            .as_deref()
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default()
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("Missing required environment variable: {name}"))
}

/// Read an environment variable, treating blank values as absent.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
