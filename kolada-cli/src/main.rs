//! Entry point for the `kolada` command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Diagnostics go to stderr; stdout carries only JSON lines.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(err) = kolada_cli::run() {
        eprintln!("kolada: {err}");
        std::process::exit(1);
    }
}
