use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::config::BIN_NAME;

/// Installs the global subscriber. `RUST_LOG` wins over `-v` when set.
pub fn set_up(verbosity: u8) {
    let crate_name = BIN_NAME.replace('-', "_");
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let filter = match format!("{crate_name}={}", max_level(verbosity)).parse() {
        Ok(directive) if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() => {
            filter.add_directive(directive)
        }
        _ => filter,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn max_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(max_level(0), "warn");
        assert_eq!(max_level(1), "info");
        assert_eq!(max_level(2), "debug");
        assert_eq!(max_level(9), "trace");
    }
}
