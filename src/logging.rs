use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::cli::LogLevel;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filter for the requested level. `RUST_LOG` overrides the flag when set.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.as_filter().into())
        .from_env_lossy()
}

/// Install the global fmt subscriber. Calling it twice is a no-op.
pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init(LogLevel::Debug);
        init(LogLevel::Trace);
    }
}
