use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`. Output goes to stderr so
/// it never interleaves with a program's own stdout. Calling this again after
/// a subscriber is installed has no effect.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    let installed = if config.timestamps {
        builder
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .try_init()
    } else {
        builder.without_time().try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
