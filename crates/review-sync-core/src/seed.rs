//! Local dataset bootstrap.
//!
//! The dataset is a JSON document shaped like a provider response,
//! `{"result": [...]}`, whose items already use the exchange field names.

use crate::reconcile::{reconcile, ReconcileCounts};
use crate::store::{ReviewStore, StoreError};
use review_sync_models::IncomingReview;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Items under `result`; entries that do not decode are skipped
pub fn parse_dataset(document: &Value) -> Vec<IncomingReview> {
    let Some(items) = document.get("result").and_then(Value::as_array) else {
        warn!("Dataset has no result list");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<IncomingReview>(item.clone()) {
            Ok(review) => Some(review),
            Err(e) => {
                debug!(error = %e, "Skipping dataset item without a usable id");
                None
            }
        })
        .collect()
}

/// Read the dataset file. `None` when the file does not exist.
pub fn load_dataset(path: &Path) -> Result<Option<Vec<IncomingReview>>, SeedError> {
    if !path.exists() {
        debug!("Dataset {:?} not found", path);
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&content).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(parse_dataset(&document)))
}

/// Populate an empty store from the dataset. Returns the number of records created.
pub fn seed_if_empty<S: ReviewStore + ?Sized>(store: &mut S, path: &Path) -> Result<usize, SeedError> {
    if store.count()? > 0 {
        debug!("Store already populated, skipping seed");
        return Ok(0);
    }

    let Some(items) = load_dataset(path)? else {
        return Ok(0);
    };
    let counts = reconcile(store, items)?;
    info!("Seeded {} reviews from {:?}", counts.created, path);
    Ok(counts.created)
}

/// Reconcile the dataset into the store regardless of its current contents
pub fn sync_from_dataset<S: ReviewStore + ?Sized>(
    store: &mut S,
    path: &Path,
) -> Result<ReconcileCounts, SeedError> {
    let Some(items) = load_dataset(path)? else {
        return Ok(ReconcileCounts::default());
    };
    Ok(reconcile(store, items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn write_dataset(dir: &Path, document: Value) -> PathBuf {
        let path = dir.join("mock_reviews.json");
        std::fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_parse_skips_items_without_ids() {
        let document = json!({"result": [
            {"id": 1, "guestName": "Ana"},
            {"guestName": "no id"},
            {"id": "abc"},
            {"id": 0}
        ]});
        let ids: Vec<i64> = parse_dataset(&document).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn test_parse_without_result_list() {
        assert!(parse_dataset(&json!({"status": "success"})).is_empty());
        assert!(parse_dataset(&json!([{"id": 1}])).is_empty());
    }

    #[test]
    fn test_missing_dataset_seeds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::new();
        assert_eq!(seed_if_empty(&mut store, &dir.path().join("absent.json")).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_seed_creates_visible_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(
            dir.path(),
            json!({"result": [
                {"id": 7453, "rating": null, "hidden": true, "reviewCategory": [{"category": "cleanliness", "rating": 10}]},
                {"id": 7454, "type": "guest-to-host", "rating": 9}
            ]}),
        );

        let mut store = MemoryStore::new();
        assert_eq!(seed_if_empty(&mut store, &path).unwrap(), 2);

        let first = store.get(7453).unwrap().unwrap();
        assert!(!first.hidden);
        assert_eq!(first.review_category.len(), 1);
        assert_eq!(store.get(7454).unwrap().unwrap().review_type, "guest-to-host");
    }

    #[test]
    fn test_seed_skips_populated_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), json!({"result": [{"id": 1}, {"id": 2}]}));

        let mut store = MemoryStore::new();
        reconcile(&mut store, vec![serde_json::from_value(json!({"id": 99})).unwrap()]).unwrap();

        assert_eq!(seed_if_empty(&mut store, &path).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_sync_from_dataset_updates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), json!({"result": [{"id": 1, "guestName": "Ana"}, {"id": 2}]}));

        let mut store = MemoryStore::new();
        seed_if_empty(&mut store, &path).unwrap();
        let counts = sync_from_dataset(&mut store, &path).unwrap();
        assert_eq!(counts, ReconcileCounts { created: 0, updated: 2 });
    }

    #[test]
    fn test_sync_from_dataset_keeps_moderation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), json!({"result": [{"id": 1, "guestName": "Ana", "rating": 8}]}));

        let mut store = MemoryStore::new();
        seed_if_empty(&mut store, &path).unwrap();
        let mut moderated = store.get(1).unwrap().unwrap();
        moderated.hidden = true;
        store.commit(vec![moderated]).unwrap();

        write_dataset(
            dir.path(),
            json!({"result": [{"id": 1, "guestName": "Ana Lopes", "rating": 10, "hidden": false}]}),
        );
        sync_from_dataset(&mut store, &path).unwrap();

        let row = store.get(1).unwrap().unwrap();
        assert!(row.hidden);
        assert_eq!(row.guest_name, "Ana Lopes");
        assert_eq!(row.rating, Some(10));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(load_dataset(&path), Err(SeedError::Parse { .. })));
    }
}
