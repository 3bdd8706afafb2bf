//! Tracing subscriber: the console formatter and the per-command log file.
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use super::line::{EventFields, LineKind, layout, paint, summary_color};

/// `$XDG_CACHE_HOME/mesa-sync/<command>.log`, falling back to `~/.cache`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".cache"))
        })?;
    Some(cache.join("mesa-sync").join(format!("{command}.log")))
}

fn timestamp() -> String {
    chrono::Utc::now().format("[%Y-%m-%d %H:%M:%S]").to_string()
}

/// Appends every event, uncoloured and timestamped, to the command's log
/// file.  The file is truncated at the start of each run.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Create the log file for `command` and write the run header.
    ///
    /// Returns `None` when the cache directory or the file cannot be created;
    /// the run then logs to the console only.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        fs::create_dir_all(path.parent()?).ok()?;
        let mut file = fs::File::create(&path).ok()?;
        let version = option_env!("MESA_SYNC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        writeln!(file, "{} mesa-sync {version} {command}", timestamp()).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let kind = LineKind::of(event.metadata());
        let fields = EventFields::of(event);
        let head = format!("{} {}", timestamp(), kind.prefix());
        let body = layout(head.len(), &fields.message);

        let mut file = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        writeln!(file, "{head}{body}").ok();
    }
}

/// Console rendering: `ERROR:` and `INFO:` lines at the left margin, copy
/// failure details aligned beneath them, stage headers and indented detail.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let kind = LineKind::of(event.metadata());
        let fields = EventFields::of(event);
        let prefix = kind.prefix();
        let body = layout(prefix.len(), &fields.message);

        match kind {
            LineKind::Summary => {
                match fields.status.as_deref().and_then(summary_color) {
                    Some(color) => writeln!(writer, "{prefix}{}", paint(&body, color)),
                    None => writeln!(writer, "{prefix}{body}"),
                }
            }
            _ => match kind.color() {
                Some(color) => writeln!(writer, "{}{body}", paint(prefix, color)),
                None => writeln!(writer, "{prefix}{body}"),
            },
        }
    }
}

/// Install the global subscriber for `command`.
///
/// Warnings and errors go to stderr, everything else to stdout.  Debug lines
/// reach the console only when `verbose` is set but are always written to
/// the log file.  Call once, before the first event.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(make_writer)
        .with_filter(console_level);
    let file = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();
}
