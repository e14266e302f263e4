//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

use log::LevelFilter;

/// Initialize the logging system
///
/// `RUST_LOG` still wins over `default_level` when it is set.
pub fn init(default_level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}

/// Parse a level name from configuration, falling back to `Info`
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels_and_defaults_unknown() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("TRACE"), LevelFilter::Trace);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }
}
