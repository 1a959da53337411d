//! Tracing subscriber set-up.

use crate::CliResult;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Maps a `-v` count to a level: 1 is `ERROR`, 5 or more is `TRACE`.
pub const fn verbosity_level(verbosity: u8) -> Level {
    match verbosity {
        0 | 1 => Level::ERROR,
        2 => Level::WARN,
        3 => Level::INFO,
        4 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global tracing subscriber.
///
/// The verbosity sets the default level. An explicit `filter` replaces it, and
/// `RUST_LOG` takes precedence over both.
pub fn init_tracing_subscriber(verbosity: u8, filter: Option<&str>) -> CliResult<()> {
    let filter = build_filter(verbosity, filter)?;
    tracing_subscriber::registry().with(fmt::layer()).with(filter).try_init()?;
    Ok(())
}

fn build_filter(verbosity: u8, filter: Option<&str>) -> CliResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    match filter {
        Some(directives) => Ok(EnvFilter::builder().parse(directives)?),
        None => Ok(EnvFilter::new(verbosity_level(verbosity).as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Level::ERROR)]
    #[case(2, Level::WARN)]
    #[case(3, Level::INFO)]
    #[case(4, Level::DEBUG)]
    #[case(9, Level::TRACE)]
    fn test_verbosity_level(#[case] verbosity: u8, #[case] level: Level) {
        assert_eq!(verbosity_level(verbosity), level);
    }

    #[test]
    fn test_invalid_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(build_filter(3, Some("blockstream=loud")).is_err());
        assert!(build_filter(3, Some("info,blockstream::engine=trace")).is_ok());
    }
}
