//! On-disk cache for directory records.
//!
//! A snapshot persists as three JSON files under the cache directory. A
//! record is stale once its mtime is older than the TTL; a record whose age
//! cannot be determined counts as stale. Saves go through a temp file and a
//! rename so readers never observe a half-written record.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::constants;
use crate::error::{CacheError, Result};

/// The three records a snapshot is persisted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Members,
    Teams,
    Memberships,
}

impl Record {
    pub const ALL: [Record; 3] = [Record::Members, Record::Teams, Record::Memberships];

    fn file_name(self) -> &'static str {
        match self {
            Record::Members => "members.json",
            Record::Teams => "teams.json",
            Record::Memberships => "memberships.json",
        }
    }
}

/// File-backed cache for directory records.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn with_ttl(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    fn path(&self, record: Record) -> PathBuf {
        self.dir.join(record.file_name())
    }

    /// Whether the record is missing or older than the TTL.
    pub fn is_stale(&self, record: Record) -> bool {
        let age = fs::metadata(self.path(record))
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|mtime| mtime.elapsed().ok());

        match age {
            Some(age) => age > self.ttl,
            None => true,
        }
    }

    /// Whether any of the three records needs refetching.
    ///
    /// Records are only ever written together, so one stale record
    /// invalidates the whole set.
    pub fn any_stale(&self) -> bool {
        Record::ALL.iter().any(|&record| self.is_stale(record))
    }

    /// Load and decode a record.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Miss` when the file does not exist and
    /// `CacheError::Parse` when it cannot be decoded.
    pub fn load<T: DeserializeOwned>(&self, record: Record) -> Result<T> {
        let path = self.path(record);
        if !path.exists() {
            return Err(CacheError::Miss {
                name: record.file_name(),
            }
            .into());
        }

        let buf = fs::read(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_slice(&buf)
            .map_err(|source| CacheError::Parse { path, source })?;

        debug!(file = record.file_name(), "cache hit");
        Ok(value)
    }

    /// Encode and atomically replace a record.
    pub fn save<T: Serialize + ?Sized>(&self, record: Record, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path(record);
        let buf = serde_json::to_vec(value).map_err(CacheError::Serialize)?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;
        tmp.write_all(&buf).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;
        tmp.persist(&path).map_err(|e| CacheError::Write {
            path: path.clone(),
            source: e.error,
        })?;

        debug!(file = record.file_name(), bytes = buf.len(), "cache updated");
        Ok(())
    }
}
