//! Logging flags.

use crate::{CliResult, init_tracing_subscriber};
use clap::{ArgAction, Parser};

/// Logging arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level: `-v` errors, `-vv` warnings, `-vvv` info, `-vvvv` debug,
    /// `-vvvvv` trace.
    #[arg(short = 'v', long = "verbosity", action = ArgAction::Count, default_value = "3", global = true)]
    pub verbosity: u8,
    /// Log filter directives, e.g. `info` or `info,blockstream::engine=debug`.
    /// Overrides the verbosity.
    #[arg(long = "log-level", env = "LOG_LEVEL", global = true)]
    pub log_level: Option<String>,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self { verbosity: 3, log_level: None }
    }
}

impl LogArgs {
    /// Installs the global tracing subscriber.
    pub fn init_tracing(&self) -> CliResult<()> {
        init_tracing_subscriber(self.verbosity, self.log_level.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn test_default_verbosity() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.log.verbosity, 3);
    }

    #[test]
    fn test_verbosity_count() {
        let cli = TestCli::try_parse_from(["test", "-vvvv"]).unwrap();
        assert_eq!(cli.log.verbosity, 4);
    }

    #[test]
    fn test_log_level() {
        let cli = TestCli::try_parse_from(["test", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log.log_level.as_deref(), Some("debug"));
    }
}
