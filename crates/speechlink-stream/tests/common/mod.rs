//! Shared helpers for the streaming integration tests.

pub mod service;

/// Route driver logs into the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "speechlink_stream=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
