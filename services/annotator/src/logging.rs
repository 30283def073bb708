//! Process-wide log sinks: events below WARN go to stdout, WARN and above to
//! stderr, either as JSON lines or as plain text prefixed with the process
//! id.

use std::fmt::Write as _;
use std::sync::OnceLock;

use anyhow::{bail, Result};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::{self, FmtContext, MakeWriter};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Layer, Registry};

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type Sinks = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

struct LogHandles {
    filter: reload::Handle<EnvFilter, Registry>,
    sinks: reload::Handle<Sinks, FilteredRegistry>,
}

static HANDLES: OnceLock<LogHandles> = OnceLock::new();

/// Install the stdout/stderr sinks. A later call swaps level and format in
/// place.
pub fn setup_logging(log_level: &str, use_basic_format: bool) -> Result<()> {
    let filter = EnvFilter::new(level_directive(log_level)?);
    let sinks: Sinks = build_sinks(use_basic_format, std::io::stdout, std::io::stderr);

    if let Some(h) = HANDLES.get() {
        h.filter.reload(filter)?;
        h.sinks.reload(sinks)?;
        return Ok(());
    }

    let (filter_layer, filter) = reload::Layer::new(filter);
    let (sinks_layer, sinks) = reload::Layer::new(sinks);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(sinks_layer)
        .try_init()?;

    let _ = HANDLES.set(LogHandles { filter, sinks });
    Ok(())
}

/// Map a level name (Python-style names accepted) to a filter directive.
pub fn level_directive(name: &str) -> Result<&'static str> {
    Ok(match name.trim().to_ascii_uppercase().as_str() {
        "NOTSET" | "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" | "FATAL" => "error",
        other => bail!("unknown log level: {other}"),
    })
}

fn build_sinks<S, O, E>(use_basic_format: bool, out: O, err: E) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    O: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    E: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let out = out.with_min_level(Level::INFO);
    let err = err.with_max_level(Level::WARN);

    if use_basic_format {
        fmt::layer()
            .with_ansi(false)
            .event_format(WithPid(fmt::format().with_thread_ids(true)))
            .with_writer(out)
            .and_then(
                fmt::layer()
                    .with_ansi(false)
                    .event_format(WithPid(fmt::format().with_thread_ids(true)))
                    .with_writer(err),
            )
            .boxed()
    } else {
        fmt::layer()
            .json()
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_writer(out)
            .and_then(
                fmt::layer()
                    .json()
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(err),
            )
            .boxed()
    }
}

struct WithPid<F>(F);

impl<S, N, F> FormatEvent<S, N> for WithPid<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "[{}] ", std::process::id())?;
        self.0.format_event(ctx, writer, event)
    }
}
