use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;

/// Name recorded when the prompt reaches end of input.
pub const ANONYMOUS_PLAYER: &str = "anonymous";

/// Errors raised while appending a score line.
#[derive(Debug, Error)]
#[error("failed to append score to {}: {source}", .path.display())]
pub struct ScoreError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Formats one score file line.
#[must_use]
pub fn score_line(player_name: &str, length: u32) -> String {
    format!("{player_name}:\t{length}\n")
}

/// Appends a score line, creating the file (and parent directories) when needed.
pub fn append_score(path: &Path, player_name: &str, length: u32) -> Result<(), ScoreError> {
    let wrap = |source| ScoreError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;
    file.write_all(score_line(player_name, length).as_bytes())
        .map_err(wrap)
}

/// Asks for the player name until a line is read.
///
/// Read errors are retried; end of input yields [`ANONYMOUS_PLAYER`].
pub fn prompt_player_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> String {
    loop {
        let _ = write!(output, "Enter your name: ");
        let _ = output.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => return ANONYMOUS_PLAYER.to_owned(),
            Ok(_) => return line.trim_end_matches(['\r', '\n']).to_owned(),
            Err(error) => warn!("failed to read player name: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::{self, Cursor, Read};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{ANONYMOUS_PLAYER, append_score, prompt_player_name, score_line};

    #[test]
    fn score_line_uses_tab_separator() {
        assert_eq!(score_line("ada", 17), "ada:\t17\n");
    }

    #[test]
    fn scores_are_appended_not_overwritten() {
        let path = unique_test_path("append");

        append_score(&path, "ada", 3).expect("first append should succeed");
        append_score(&path, "bob", 12).expect("second append should succeed");

        let contents = fs::read_to_string(&path).expect("score file should exist");
        assert_eq!(contents, "ada:\t3\nbob:\t12\n");
        cleanup_test_path(&path);
    }

    #[test]
    fn append_into_unwritable_location_is_an_error() {
        let path = unique_test_path("blocked");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        // A directory where the file should be.
        fs::create_dir_all(&path).expect("blocking directory should be creatable");

        assert!(append_score(&path, "ada", 1).is_err());

        let _ = fs::remove_dir(&path);
        cleanup_test_path(&path);
    }

    #[test]
    fn prompt_trims_line_ending() {
        let mut input = Cursor::new("grace\r\n");
        let mut output = Vec::new();

        let name = prompt_player_name(&mut input, &mut output);

        assert_eq!(name, "grace");
        assert_eq!(String::from_utf8_lossy(&output), "Enter your name: ");
    }

    #[test]
    fn prompt_at_eof_is_anonymous() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        assert_eq!(prompt_player_name(&mut input, &mut output), ANONYMOUS_PLAYER);
    }

    #[test]
    fn prompt_retries_after_read_error() {
        let mut input = io::BufReader::new(FlakyReader {
            failures: 2,
            data: Cursor::new(b"linus\n".to_vec()),
        });
        let mut output = Vec::new();

        let name = prompt_player_name(&mut input, &mut output);

        assert_eq!(name, "linus");
        assert_eq!(
            String::from_utf8_lossy(&output).matches("Enter your name: ").count(),
            3
        );
    }

    struct FlakyReader {
        failures: usize,
        data: Cursor<Vec<u8>>,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(io::Error::other("terminal hiccup"));
            }
            self.data.read(buf)
        }
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-score-tests")
            .join(format!("{label}-{nanos}.txt"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
