//! Log output for the command-line tools.
//!
//! Library code only emits records through the `log` facade; binaries call
//! [`init`] once at start-up. Records are forwarded to a `tracing_subscriber`
//! formatter on stderr, filtered by the directives in `KALDI_IO_LOG`
//! (for example `warn` or `kaldi_io_streams=debug`).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "KALDI_IO_LOG";

/// Used when `KALDI_IO_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// The filter named by `KALDI_IO_LOG`, falling back to
/// [`DEFAULT_DIRECTIVES`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the stderr subscriber and the `log` bridge. Calling it twice is
/// harmless; only the first call takes effect.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
