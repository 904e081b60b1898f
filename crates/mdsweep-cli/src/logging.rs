use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps the counted `-v` flag to a level floor; `--quiet` silences
/// everything.
fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: a compact stderr layer, plus a plain
/// (non-ANSI) file layer when `--log-file` is given. Long sweeps tend to run
/// unattended, so the file copy keeps the full record even when the terminal
/// scrolls away.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(level_for(verbosity, quiet))
        .with(stderr_layer);

    match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            let file_layer = fmt::layer().with_writer(file).with_ansi(false).with_target(true);
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, info, warn};

    static INIT: Once = Once::new();

    #[test]
    fn verbosity_maps_to_increasing_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(5, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn global_subscriber_accepts_all_macro_levels() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("global logger");
        });

        warn!("sweep warning");
        info!("sweep progress");
        debug!("sweep detail");
    }

    #[test]
    #[serial]
    fn file_layer_writes_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("mdsweep.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer().with_writer(file).with_ansi(false);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            info!("instance sim_mu-3.5 finished");
        });

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("instance sim_mu-3.5 finished"));
        assert!(content.contains("INFO"));
        assert!(!content.contains('\u{1b}'), "ANSI escapes in file log");
    }

    #[test]
    #[serial]
    fn unwritable_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
