//! Interaction history — an ordered JSON array of [`InteractionRecord`]s.
//!
//! Records are only ever appended. Every append reloads the whole array, pushes
//! the new record, and replaces the file: the new contents go to a temp file in
//! the same directory which is then renamed over the store, all while holding an
//! exclusive lock on a sidecar `<store>.lock` file.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::error::{MemoryError, Result};
use super::types::InteractionRecord;
use super::StoreConfig;

#[derive(Debug, Clone)]
pub struct InteractionStore {
    path: PathBuf,
}

impl InteractionStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { path: config.path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty store if none exists yet.
    pub fn init(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MemoryError::io(parent, e))?;
        }
        self.write_all(&[])?;
        tracing::info!(path = %self.path.display(), "interaction store created");
        Ok(())
    }

    /// Load every record in insertion order.
    ///
    /// A missing store is an error, not an empty history.
    pub fn load_all(&self) -> Result<Vec<InteractionRecord>> {
        let file = File::open(&self.path).map_err(|e| MemoryError::io(&self.path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| MemoryError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.load_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Append one record. Returns the new number of stored records.
    ///
    /// A missing store fails before the lock file is created.
    pub fn append(&self, record: InteractionRecord) -> Result<usize> {
        if !self.path.exists() {
            return Err(MemoryError::io(
                &self.path,
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }
        let lock = self.lock()?;

        let mut records = self.load_all()?;
        records.push(record);
        self.write_all(&records)?;

        FileExt::unlock(&lock).map_err(|e| MemoryError::io(self.lock_path(), e))?;

        tracing::debug!(
            path = %self.path.display(),
            len = records.len(),
            "interaction appended"
        );
        Ok(records.len())
    }

    /// Fetch by reverse index: 0 is the most recent record.
    pub fn get_by_reverse_index(&self, index: usize) -> Result<InteractionRecord> {
        let mut records = self.load_all()?;
        let len = records.len();
        if index >= len {
            return Err(MemoryError::IndexOutOfRange { index, len });
        }
        Ok(records.swap_remove(len - index - 1))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Take the exclusive write lock. Released on unlock or when the handle drops.
    fn lock(&self) -> Result<File> {
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| MemoryError::io(&lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| MemoryError::io(&lock_path, e))?;
        Ok(file)
    }

    /// Replace the store with `records` via temp file + rename.
    fn write_all(&self, records: &[InteractionRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let rendered = render_json(&self.path, records)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| MemoryError::io(dir, e))?;
        tmp.write_all(&rendered)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| MemoryError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| MemoryError::io(&self.path, e.error))?;
        Ok(())
    }
}

/// Pretty JSON for `value`. A serialization failure is a write failure on `path`.
fn render_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| MemoryError::io(path, std::io::Error::other(e)))
}
