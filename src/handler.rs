use anyhow::Result;
use bytes::Bytes;
use tracing::warn;

use crate::config::Settings;
use crate::extract::extract_and_upload;
use crate::notify::{Mailer, send_report};
use crate::report::Reporter;
use crate::store::ObjectStore;

/// Run one extraction invocation end to end.
///
/// On success the full diagnostic report is mailed under an
/// `Extracted: {name}.zip` subject. On failure the rendered error chain is
/// mailed under an `Extraction job failed: {name}.zip` subject, and the
/// extraction error is still returned so the caller's own failure policy
/// applies. Each invocation gets a fresh reporter.
pub async fn run_invocation(
    store: &dyn ObjectStore,
    mailer: &dyn Mailer,
    settings: &Settings,
    archive: Bytes,
    archive_name: &str,
) -> Result<()> {
    let mut reporter = Reporter::new();

    match extract_and_upload(store, settings, &mut reporter, archive, archive_name).await {
        Ok(()) => {
            let subject = format!("Extracted: {archive_name}.zip");
            send_report(mailer, settings, &subject, reporter.lines()).await?;
            Ok(())
        }
        Err(err) => {
            let subject = format!("Extraction job failed: {archive_name}.zip");
            let failure = anyhow::Error::new(err);
            let body = vec![format!("{failure:?}")];

            // The failure notification is attempted regardless; the
            // extraction error takes precedence over a transport error here.
            if let Err(mail_err) = send_report(mailer, settings, &subject, &body).await {
                warn!("Failed to send failure notification: {mail_err:#}");
            }

            Err(failure)
        }
    }
}
