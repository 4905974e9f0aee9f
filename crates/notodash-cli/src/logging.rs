// Process logging on stderr

use tracing::Level;

/// Which subcommand is logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Run,
    Build,
}

/// Maximum level for the verbosity flags
///
/// `run` logs progress by default; `build` stays at warnings unless `-v` is
/// given.
pub fn level_for(mode: LogMode, verbose: bool, quiet: bool) -> Level {
    match (mode, verbose, quiet) {
        (_, _, true) => Level::WARN,
        (LogMode::Run, true, false) => Level::DEBUG,
        (LogMode::Run, false, false) => Level::INFO,
        (LogMode::Build, true, false) => Level::INFO,
        (LogMode::Build, false, false) => Level::WARN,
    }
}

/// Install the fmt subscriber; later calls are ignored
pub fn init_logging(mode: LogMode, verbose: bool, quiet: bool) {
    let level = level_for(mode, verbose, quiet);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_levels() {
        assert_eq!(level_for(LogMode::Run, false, false), Level::INFO);
        assert_eq!(level_for(LogMode::Run, true, false), Level::DEBUG);
        assert_eq!(level_for(LogMode::Run, false, true), Level::WARN);
    }

    #[test]
    fn test_build_levels() {
        assert_eq!(level_for(LogMode::Build, false, false), Level::WARN);
        assert_eq!(level_for(LogMode::Build, true, false), Level::INFO);
        assert_eq!(level_for(LogMode::Build, true, true), Level::WARN);
    }
}
