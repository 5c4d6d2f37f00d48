//! Tracing setup for the command line.
//!
//! Two layers share one registry:
//! - a file layer writing to `langws.log` in the temp dir with daily rotation,
//!   filtered by `RUST_LOG` (default "info"),
//! - a stderr layer whose default level follows `--quiet`/`--verbose` and the
//!   `debug` setting, also overridable with `RUST_LOG`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use crate::args::GlobalArgs;

/// Initialize the dual-layer tracing subscriber.
///
/// Returns a `WorkerGuard` that must be kept alive for the file logging to work.
pub fn init_tracing(args: &GlobalArgs, debug: bool) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(std::env::temp_dir(), "langws.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(file_filter);

    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level(debug)));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(stderr_filter);

    if let Err(e) = Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Failed to install tracing subscriber: {e}");
    }

    guard
}
