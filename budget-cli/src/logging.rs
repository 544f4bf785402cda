use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

// --- Formatter ---

/// Compact event format shared by the terminal and file layers:
/// `HH:MM:SS.mmm LEVEL crate::path/file.rs:line fields`.
///
/// The location keeps the crate name because `src/` paths repeat across the
/// workspace members.
pub struct LocalFmt;

fn level_colour(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

/// `budget_core::calculations/budget.rs` for an event from that file.
fn source_location(meta: &tracing::Metadata<'_>) -> Option<String> {
    let file = meta.file()?;
    let relative = file.rsplit_once("src/").map_or(file, |(_, rest)| rest);
    let krate = meta.target().split("::").next().unwrap_or_default();
    Some(match meta.line() {
        Some(line) => format!("{krate}::{relative}:{line}"),
        None => format!("{krate}::{relative}"),
    })
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let paint = |code: &str, text: &dyn std::fmt::Display| {
            if ansi {
                format!("\x1b[{code}m{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };

        let time = Local::now().format("%H:%M:%S%.3f");
        let level = format!("{:>5}", meta.level());
        write!(
            writer,
            "{} {} ",
            paint("2", &time),
            paint(level_colour(meta.level()), &level)
        )?;
        if let Some(location) = source_location(meta) {
            write!(writer, "{} ", paint("36", &location))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Setup ---

/// Builds the level filter.
///
/// An explicit `level` wins over `RUST_LOG`; with neither, `info` is used.
/// Accepts a bare level ("warn", "debug") or any full EnvFilter directive.
pub fn make_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: coloured when attached to a terminal, plain when piped. Stdout
///   is left to the report.
/// - File: appended to `log_file` without colours, when given.
pub fn init_logging(
    level: Option<&str>,
    log_file: Option<&Path>,
) -> Result<()> {
    let filter = make_filter(level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = log_file
        .map(open_log_file)
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn local_fmt_writes_level_location_and_fields() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(false)
                .with_writer(captured.clone()),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(remaining_days = 1, "period income is zero");
        });

        let line = captured.contents();
        assert!(line.contains(" WARN "), "{line}");
        assert!(line.contains("budget_cli::logging.rs:"), "{line}");
        assert!(line.contains("period income is zero"), "{line}");
        assert!(line.contains("remaining_days=1"), "{line}");
        assert!(!line.contains('\x1b'), "{line}");
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn ansi_output_colours_level_and_location() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(true)
                .with_writer(captured.clone()),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("cannot read settings");
        });

        let line = captured.contents();
        assert!(line.contains("\x1b[1;31mERROR\x1b[0m"), "{line:?}");
        assert!(line.contains("\x1b[36mbudget_cli::logging.rs:"), "{line:?}");
    }

    #[test]
    fn explicit_level_builds_filter() {
        assert!(make_filter(Some("debug")).is_ok());
        assert!(make_filter(Some("budget_core=trace,warn")).is_ok());
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = make_filter(Some("budget_core=loud")).unwrap_err();

        assert!(err.to_string().contains("invalid log level"));
    }
}
