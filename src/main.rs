use std::time::Duration;

use clap::{Parser, Subcommand};

use s3unzip::config::Settings;
use s3unzip::notify::SendGridMailer;
use s3unzip::store::{ObjectStore, S3Store};
use s3unzip::{handler, keepalive};

#[derive(Parser)]
#[command(name = "s3unzip", about = "Extract ZIP archives from S3 and email a report")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract one archive object into the configured destination bucket
    Extract {
        /// Bucket holding the archive object
        #[arg(long)]
        bucket: String,
        /// Key of the archive object
        #[arg(long)]
        key: String,
    },
    /// Log on a fixed interval to keep the host warm
    Keepalive {
        /// Seconds between ticks
        #[arg(long, default_value_t = keepalive::DEFAULT_PERIOD.as_secs())]
        period_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { bucket, key } => {
            let settings = Settings::from_env()?;
            let store = S3Store::new().await?;
            let mailer =
                SendGridMailer::new(settings.sendgrid_api_key.clone().unwrap_or_default());

            let archive = store.get_object(&bucket, &key).await?;
            let name = archive_name_from_key(&key);

            handler::run_invocation(&store, &mailer, &settings, archive, &name).await
        }
        Command::Keepalive { period_secs } => {
            keepalive::run(Duration::from_secs(period_secs)).await;
            Ok(())
        }
    }
}

/// Logical archive name: the key's basename with a trailing `.zip` stripped.
fn archive_name_from_key(key: &str) -> String {
    let base = key.rsplit('/').next().unwrap_or(key);
    base.strip_suffix(".zip")
        .or_else(|| base.strip_suffix(".ZIP"))
        .unwrap_or(base)
        .to_string()
}
