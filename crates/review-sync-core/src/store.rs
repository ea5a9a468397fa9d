use review_sync_models::ReviewRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode store file {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value-by-id review storage.
///
/// Category entries live inside their parent record and are only reachable
/// through it. `commit` must apply the whole batch or nothing.
pub trait ReviewStore {
    fn get(&self, id: i64) -> Result<Option<ReviewRecord>, StoreError>;
    fn list(&self) -> Result<Vec<ReviewRecord>, StoreError>;
    fn count(&self) -> Result<usize, StoreError>;
    fn commit(&mut self, records: Vec<ReviewRecord>) -> Result<(), StoreError>;
}

/// Pending changes against a store, made durable by [`UnitOfWork::commit`].
///
/// Dropping a unit of work without committing discards everything it holds.
pub struct UnitOfWork<'s, S: ReviewStore + ?Sized> {
    store: &'s mut S,
    pending: BTreeMap<i64, ReviewRecord>,
    categories_deleted: usize,
}

impl<'s, S: ReviewStore + ?Sized> UnitOfWork<'s, S> {
    pub fn begin(store: &'s mut S) -> Self {
        Self {
            store,
            pending: BTreeMap::new(),
            categories_deleted: 0,
        }
    }

    /// Read through pending changes to the store
    pub fn get(&self, id: i64) -> Result<Option<ReviewRecord>, StoreError> {
        match self.pending.get(&id) {
            Some(record) => Ok(Some(record.clone())),
            None => self.store.get(id),
        }
    }

    pub fn insert(&mut self, record: ReviewRecord) {
        self.pending.insert(record.id, record);
    }

    /// Destroy every category entry of `record`
    pub fn delete_categories(&mut self, record: &mut ReviewRecord) -> usize {
        let removed = record.review_category.len();
        record.review_category.clear();
        self.categories_deleted += removed;
        removed
    }

    /// Persist all pending records atomically; returns how many were written
    pub fn commit(self) -> Result<usize, StoreError> {
        let written = self.pending.len();
        if written == 0 {
            return Ok(0);
        }
        debug!(
            records = written,
            categories_deleted = self.categories_deleted,
            "Committing unit of work"
        );
        self.store.commit(self.pending.into_values().collect())?;
        Ok(written)
    }
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<i64, ReviewRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewStore for MemoryStore {
    fn get(&self, id: i64) -> Result<Option<ReviewRecord>, StoreError> {
        Ok(self.records.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<ReviewRecord>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }

    fn commit(&mut self, records: Vec<ReviewRecord>) -> Result<(), StoreError> {
        for record in records {
            self.records.insert(record.id, record);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    reviews: Vec<ReviewRecord>,
}

const STORE_FILE_VERSION: u32 = 1;

/// Store persisted as a single JSON document.
///
/// Commits write a temp file and rename it over the original, so a crash
/// leaves either the old or the new document.
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<i64, ReviewRecord>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = Self::load(&path)?;
        info!("Opened review store {:?} ({} reviews)", path, records.len());
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<i64, ReviewRecord>, StoreError> {
        if !path.exists() {
            debug!("Review store {:?} does not exist, starting empty", path);
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match serde_json::from_str::<StoreFile>(&content) {
            Ok(file) => Ok(file.reviews.into_iter().map(|r| (r.id, r)).collect()),
            Err(e) => {
                // Keep the unreadable file around and start fresh
                let backup_path = path.with_extension("json.bak");
                if let Err(backup_err) = std::fs::copy(path, &backup_path) {
                    warn!(
                        "Review store {:?} is corrupt ({}) and could not be backed up: {}. Starting empty.",
                        path, e, backup_err
                    );
                } else {
                    warn!(
                        "Review store {:?} is corrupt ({}). Backed up to {:?} and starting empty.",
                        path, e, backup_path
                    );
                }
                Ok(BTreeMap::new())
            }
        }
    }

    fn write(&self, records: &BTreeMap<i64, ReviewRecord>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = StoreFile {
            version: STORE_FILE_VERSION,
            reviews: records.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl ReviewStore for JsonFileStore {
    fn get(&self, id: i64) -> Result<Option<ReviewRecord>, StoreError> {
        Ok(self.records.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<ReviewRecord>, StoreError> {
        Ok(self.records.values().cloned().collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }

    fn commit(&mut self, records: Vec<ReviewRecord>) -> Result<(), StoreError> {
        let mut next = self.records.clone();
        for record in records {
            next.insert(record.id, record);
        }
        self.write(&next)?;
        self.records = next;
        Ok(())
    }
}
