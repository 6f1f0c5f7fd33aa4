//! Logging setup
//!
//! Builds a `tracing` dispatcher for a single CLI invocation. Nothing here
//! installs a global default: callers scope the returned [`Dispatch`] with
//! [`tracing::dispatcher::with_default`], so repeated or concurrent
//! invocations never see each other's subscriber.

use console::Term;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;

/// Default level when `--log-level` is not given
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Map a level name to a [`Level`].
///
/// Accepts `debug`, `info`, `warn`, `error` in any case; anything else is `info`.
pub fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Create a dispatcher for the given level string, writing to `writer`.
///
/// `writer` is expected to be stderr: the format follows whether stderr is a
/// terminal (human-readable text) or not (JSON lines). Callers writing
/// anywhere else should pick the format themselves with [`build_dispatch`].
pub fn init_logging<W>(level: &str, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let is_tty = Term::stderr().is_term();
    build_dispatch(parse_level(level), writer, is_tty)
}

/// Create a dispatcher with an explicit output format
pub fn build_dispatch<W>(level: Level, writer: W, is_tty: bool) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(writer);

    if is_tty {
        Dispatch::new(builder.with_ansi(true).finish())
    } else {
        Dispatch::new(
            builder
                .with_ansi(false)
                .json()
                .flatten_event(true)
                .with_span_list(false)
                .finish(),
        )
    }
}
