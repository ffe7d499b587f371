//! Persisted file-hash index
//!
//! A JSON document mapping root-relative paths to their content digest and
//! modification time, used by the incremental reindexing job for change
//! detection. [`IndexStore::update_repository`] reconciles the persisted
//! state with a fresh file listing: removed files are dropped, files whose
//! mtime advanced are rehashed, everything else is left untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::hash::{file_digest, HashAlgorithm};
use super::IndexError;

/// One indexed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub digest: String,
    /// Modification time, seconds since the Unix epoch
    pub modified: u64,
}

/// The persisted index document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIndex {
    pub root_path: String,
    /// Last reconciliation time, seconds since the Unix epoch
    pub last_update: u64,
    pub files: BTreeMap<String, FileRecord>,
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Handle to a JSON index file on disk.
pub struct IndexStore {
    path: PathBuf,
    algorithm: HashAlgorithm,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        IndexStore {
            path: path.into(),
            algorithm: HashAlgorithm::Sha256,
        }
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Load the persisted index; a missing file is an empty index.
    pub fn load(&self) -> Result<FileIndex, IndexError> {
        if !self.path.exists() {
            return Ok(FileIndex::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| IndexError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| IndexError::Store(e.to_string()))
    }

    pub fn save(&self, index: &FileIndex) -> Result<(), IndexError> {
        let content =
            serde_json::to_string_pretty(index).map_err(|e| IndexError::Store(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| IndexError::Io(e.to_string()))
    }

    /// Reconcile the persisted index with a fresh file listing under `root`.
    ///
    /// Files that vanished from the listing are dropped; files whose mtime
    /// is newer than the recorded one are rehashed; files that disappear
    /// between listing and hashing are skipped silently.
    pub fn update_repository(
        &self,
        root: &Path,
        files: &[PathBuf],
    ) -> Result<UpdateSummary, IndexError> {
        let mut index = self.load()?;
        let mut summary = UpdateSummary::default();

        let listed: BTreeMap<String, &PathBuf> = files
            .iter()
            .map(|p| (p.to_string_lossy().replace('\\', "/"), p))
            .collect();

        let stale: Vec<String> = index
            .files
            .keys()
            .filter(|key| !listed.contains_key(*key))
            .cloned()
            .collect();
        summary.removed = stale.len();
        for key in stale {
            index.files.remove(&key);
        }

        for (key, relative) in &listed {
            let full = root.join(relative);
            let Ok(metadata) = fs::metadata(&full) else {
                log::debug!("listed file vanished, skipping: {}", full.display());
                continue;
            };
            let modified = system_time_secs(metadata.modified().ok());
            match index.files.get(key) {
                Some(record) if record.modified >= modified => {
                    summary.unchanged += 1;
                    continue;
                }
                Some(_) => summary.updated += 1,
                None => summary.added += 1,
            }
            let digest = match file_digest(&full, self.algorithm) {
                Ok(digest) => digest,
                Err(err) => {
                    log::debug!("could not hash {}: {}", full.display(), err);
                    continue;
                }
            };
            index.files.insert(key.clone(), FileRecord { digest, modified });
        }

        index.root_path = root.to_string_lossy().into_owned();
        index.last_update = system_time_secs(Some(SystemTime::now()));
        self.save(&index)?;
        log::info!(
            "index updated: {} added, {} updated, {} removed, {} unchanged",
            summary.added,
            summary.updated,
            summary.removed,
            summary.unchanged
        );
        Ok(summary)
    }
}

fn system_time_secs(time: Option<SystemTime>) -> u64 {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
