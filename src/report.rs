use tracing::{info, trace};

/// Accumulating logger for one extraction invocation.
///
/// Informational messages are written to the operational log stream and
/// appended to an in-memory ordered list that becomes the email body.
/// Trace messages go to the operational stream only.
///
/// One invocation owns one `Reporter`; there is no cross-invocation sharing.
#[derive(Debug, Default)]
pub struct Reporter {
    lines: Vec<String>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a durable line: emitted to the log stream and kept for the report.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.lines.push(message);
    }

    /// Log an ephemeral line: emitted to the log stream only.
    pub fn trace(&self, message: impl AsRef<str>) {
        trace!("{}", message.as_ref());
    }

    /// The report accumulated so far, in call order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the reporter, yielding the report lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
