//! Logging Module
//! Console tracing output for the pipeline.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a console subscriber. `RUST_LOG` overrides the default level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("meteorite_observatory=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
