//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use common::Environment;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Production logs are JSON, everything else is
/// human-readable text.
pub fn init(environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.default_log_level()));

    let registry = tracing_subscriber::registry().with(filter);

    match environment {
        Environment::Prod => registry.with(fmt::layer().json().with_target(false)).init(),
        Environment::Local | Environment::Dev => registry.with(fmt::layer()).init(),
    }
}
