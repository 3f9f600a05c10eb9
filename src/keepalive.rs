use std::time::Duration;

use chrono::Local;
use tracing::info;

/// Default tick period: every five minutes
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(300);

/// Write the single keep-alive log line. No other side effect.
pub fn tick() {
    info!("Keep-alive executed at: {}", Local::now().to_rfc3339());
}

/// Log on a fixed interval forever. The first tick fires immediately.
pub async fn run(period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        tick();
    }
}
