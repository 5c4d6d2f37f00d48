use clap::Parser;

#[derive(Parser)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags accepted by every subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GlobalArgs {
    /// Only print errors; suppress the document report.
    #[arg(global = true, long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log more to stderr (-v info, -vv debug, -vvv trace).
    #[arg(global = true, action = clap::ArgAction::Count, long, short, conflicts_with = "quiet")]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Default stderr log level when `RUST_LOG` is unset.
    ///
    /// The `debug` setting only applies when no verbosity flag is given.
    #[must_use]
    pub fn log_level(&self, debug: bool) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 if debug => "debug",
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(quiet: bool, verbose: u8) -> GlobalArgs {
        GlobalArgs { quiet, verbose }
    }

    #[test]
    fn test_quiet_only_shows_errors() {
        assert_eq!(global(true, 0).log_level(true), "error");
    }

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(global(false, 0).log_level(false), "warn");
        assert_eq!(global(false, 1).log_level(false), "info");
        assert_eq!(global(false, 2).log_level(false), "debug");
        assert_eq!(global(false, 5).log_level(false), "trace");
    }

    #[test]
    fn test_debug_setting_applies_without_flags() {
        assert_eq!(global(false, 0).log_level(true), "debug");
        assert_eq!(global(false, 1).log_level(true), "info");
    }

    #[test]
    fn test_verbose_counts_and_conflicts_with_quiet() {
        let args = Args::try_parse_from(["langws", "-vv"]).unwrap();
        assert_eq!(args.global.verbose, 2);
        assert!(Args::try_parse_from(["langws", "-q", "-v"]).is_err());
    }
}
