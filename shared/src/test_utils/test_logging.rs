use env_logger::Builder;
use log::LevelFilter;
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Routes store and handler logs to the test output.
///
/// `tracing` events fall back to the `log` facade when no subscriber is
/// installed, so env_logger picks up both. Quiet (error only) unless
/// LOG_LEVEL is set, e.g. `LOG_LEVEL=debug cargo test`.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let level_filter = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Error);

        let _ = Builder::from_default_env()
            .filter_level(level_filter)
            .is_test(true)
            .try_init();
    });
}
