//! Logger setup for the command line binary

use log::debug;

/// Level used when `RUST_LOG` is not set
pub fn default_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Install `env_logger` once; later calls are ignored
pub fn init_logging(quiet: bool, verbose: u8) {
    let level = default_level(quiet, verbose);
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
    debug!("Logger initialized with level: {}", level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true, 2), "error");
        assert_eq!(default_level(false, 0), "warn");
        assert_eq!(default_level(false, 1), "info");
        assert_eq!(default_level(false, 5), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(false, 0);
        init_logging(true, 0);
    }
}
