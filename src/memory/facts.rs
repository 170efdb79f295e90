//! Fact log — newline-delimited, timestamped free-text facts.
//!
//! Each line reads `HH:MM:SS DD/MM/YYYY <fact>`. Lines are only appended; the
//! only destructive operation is [`FactStore::clear`], which removes the file.
//! Unlike the interaction store, a missing fact log is a valid empty state.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::error::{MemoryError, Result};
use super::StoreConfig;

/// `strftime` pattern for the prefix of every fact line.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

#[derive(Debug, Clone)]
pub struct FactStore {
    path: PathBuf,
}

impl FactStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { path: config.path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `text` stamped with the current local time.
    pub fn append(&self, text: &str) -> Result<()> {
        self.append_at(text, Local::now())
    }

    /// Append `text` stamped with `at`. Creates the parent directory if needed.
    pub fn append_at(&self, text: &str, at: DateTime<Local>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MemoryError::io(parent, e))?;
        }

        let line = format_entry(text, at);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MemoryError::io(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| MemoryError::io(&self.path, e))?;

        tracing::info!(path = %self.path.display(), "fact memorized");
        Ok(())
    }

    /// The whole log in original order, or an empty string if nothing was ever stored.
    pub fn read_all(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(MemoryError::io(&self.path, e)),
        }
    }

    /// Delete the log. Clearing an absent log is a no-op.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "fact memory cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MemoryError::io(&self.path, e)),
        }
    }
}

/// Render one fact line. Line breaks inside `text` collapse to single spaces.
pub fn format_entry(text: &str, at: DateTime<Local>) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{} {}", at.format(TIMESTAMP_FORMAT), flat)
}

/// Split a fact log into its non-blank lines.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|l| !l.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 1, 9, 7, 5, 3).unwrap()
    }

    #[test]
    fn format_entry_uses_day_first_24h_prefix() {
        assert_eq!(
            format_entry("printer is on floor 2", at()),
            "07:05:03 09/01/2023 printer is on floor 2"
        );
    }

    #[test]
    fn format_entry_flattens_line_breaks() {
        assert_eq!(
            format_entry("first\nsecond\r\n  third", at()),
            "07:05:03 09/01/2023 first second third"
        );
    }

    #[test]
    fn append_at_writes_one_line_per_fact() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = FactStore::new(StoreConfig::new(tmp.path().join("facts.txt")));

        store.append_at("one", at()).unwrap();
        store.append_at("two\nlines", at()).unwrap();

        let text = store.read_all().unwrap();
        assert_eq!(
            text,
            "07:05:03 09/01/2023 one\n07:05:03 09/01/2023 two lines\n"
        );
        assert_eq!(lines(&text).count(), 2);
    }

    #[test]
    fn lines_skips_blank_lines() {
        let text = "a\n\n   \nb\n";
        assert_eq!(lines(text).collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
