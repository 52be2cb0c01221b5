use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use thiserror::Error;

/// Errors raised while routing log output to a file.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start logger: {0}")]
    Install(#[from] log::SetLoggerError),
}

/// `--verbose` raises the filter so spawn and food events are recorded.
#[must_use]
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Creates (truncating) the log file and any missing parent directories.
pub fn open_log_file(path: &Path) -> Result<File, LogError> {
    let wrap = |source| LogError::Open {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    File::create(path).map_err(wrap)
}

/// Installs the global file logger. Can succeed at most once per process.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> Result<(), LogError> {
    let file = open_log_file(path)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use log::LevelFilter;

    use super::{LogError, level_for, open_log_file};

    #[test]
    fn verbose_enables_debug_events() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Info);
    }

    #[test]
    fn log_file_parents_are_created() {
        let dir = unique_test_dir("nested");
        let path = dir.join("deeper").join("grid-snake.log");

        open_log_file(&path).expect("log file should be creatable");
        assert!(path.is_file());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unusable_log_location_is_reported_not_panicked() {
        let dir = unique_test_dir("blocked");
        fs::create_dir_all(&dir).expect("test directory should be creatable");
        let blocker = dir.join("not-a-dir");
        fs::write(&blocker, "").expect("blocking file should be writable");

        let result = open_log_file(&blocker.join("grid-snake.log"));

        assert!(matches!(result, Err(LogError::Open { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    fn unique_test_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir().join(format!("grid-snake-log-tests-{label}-{nanos}"))
    }
}
