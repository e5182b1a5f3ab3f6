use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a console subscriber.
///
/// `--debug` forces the `debug` level; otherwise `RUST_LOG` applies and
/// defaults to `info`.
pub fn setup_logging(debug_mode: bool) {
    let fallback = if debug_mode { "debug" } else { "info" };
    let env_filter = if debug_mode {
        EnvFilter::new(fallback)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .try_init();

    tracing::debug!(debug = debug_mode, "logging initialized");
}
