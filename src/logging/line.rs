//! What each kind of output line looks like.
//!
//! The console and the log file print the same prefixes; only the colour
//! and the timestamp differ.
use tracing::{Level, Metadata};

/// Target for stage headers.
pub(super) const STAGE_TARGET: &str = "mesa_sync::stage";
/// Target for operator notices (`INFO: ...`).
pub(super) const NOTICE_TARGET: &str = "mesa_sync::notice";
/// Target for dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "mesa_sync::dry_run";
/// Target for run summary rows; carries a `status` field.
pub(super) const SUMMARY_TARGET: &str = "mesa_sync::summary";

/// Kind of line an event is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LineKind {
    Stage,
    Notice,
    DryRun,
    Summary,
    Error,
    Warn,
    Info,
    Debug,
}

impl LineKind {
    pub(super) fn of(metadata: &Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, NOTICE_TARGET) => Self::Notice,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, SUMMARY_TARGET) => Self::Summary,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Uncoloured text written before the message.
    pub(super) const fn prefix(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::Notice => "INFO: ",
            Self::DryRun => "  [DRY RUN] ",
            Self::Error => "ERROR: ",
            Self::Warn => "WARN: ",
            Self::Summary | Self::Info => "  ",
            Self::Debug => "  debug: ",
        }
    }

    /// SGR parameters used for the prefix on the console.
    pub(super) const fn color(self) -> Option<&'static str> {
        match self {
            Self::Stage => Some("1;34"),
            Self::Notice => Some("32"),
            Self::DryRun | Self::Warn => Some("33"),
            Self::Error => Some("31"),
            Self::Debug => Some("2"),
            Self::Summary | Self::Info => None,
        }
    }
}

/// Colour of a summary row, keyed by the `status` field.
pub(super) fn summary_color(status: &str) -> Option<&'static str> {
    match status {
        "ok" => Some("32"),
        "incomplete" => Some("33"),
        "failed" => Some("31"),
        "n/a" => Some("2"),
        _ => None,
    }
}

/// Wrap `text` in an SGR sequence.
pub(super) fn paint(text: &str, color: &str) -> String {
    format!("\x1b[{color}m{text}\x1b[0m")
}

/// Lay out a possibly multi-line message whose first line follows a prefix
/// `indent` columns wide.
///
/// Continuation lines (the `src:` and `dst:` lines of a copy failure) are
/// padded so they start under the first character of the message.
pub(super) fn layout(indent: usize, message: &str) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::with_capacity(message.len());
    for (i, line) in message.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}

/// The fields the renderers read from an event.
#[derive(Debug, Default)]
pub(super) struct EventFields {
    pub(super) message: String,
    pub(super) status: Option<String>,
}

impl EventFields {
    pub(super) fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl tracing::field::Visit for EventFields {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "status" => self.status = Some(format!("{value:?}")),
            _ => {}
        }
    }
}
