// 📜 Logging - tracing subscriber setup
//
// Level comes from RUST_LOG (default: info), e.g.
//   RUST_LOG=debug
//   RUST_LOG=cookbook=trace

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber for binaries.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Verbose subscriber captured by the test harness. Safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
