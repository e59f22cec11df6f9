use tracing_subscriber::EnvFilter;

/// Initialize structured JSON logging for a Lambda binary.
///
/// CloudWatch stamps every line itself, so timestamps and ANSI colours are left out.
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}
