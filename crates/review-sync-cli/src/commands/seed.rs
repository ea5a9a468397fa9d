use super::AppContext;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use review_sync_core::{seed_if_empty, sync_from_dataset};
use serde_json::json;
use std::path::PathBuf;

pub fn run_seed(dataset: Option<PathBuf>, output: &Output) -> Result<()> {
    tracing::debug!("Seed command started");

    let ctx = AppContext::load()?;
    let dataset = dataset.unwrap_or_else(|| ctx.config.dataset_path(ctx.paths.dataset_file()));
    let mut store = ctx.open_store()?;

    if !dataset.exists() {
        output.warn(format!("Dataset not found at {}", dataset.display()));
    }

    let seeded = seed_if_empty(&mut store, &dataset)
        .map_err(|e| color_eyre::eyre::eyre!("Seeding failed: {}", e))?;
    let synced = sync_from_dataset(&mut store, &dataset)
        .map_err(|e| color_eyre::eyre::eyre!("Dataset sync failed: {}", e))?;

    match output.format() {
        OutputFormat::Human => {
            if seeded > 0 {
                output.success(format!("Seeded {} reviews into {}", seeded, store.path().display()));
            }
            output.success(format!(
                "Dataset reconciled: {} created, {} updated",
                synced.created, synced.updated
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "success": true,
                "seeded": seeded,
                "created": synced.created,
                "updated": synced.updated,
            }));
        }
    }

    Ok(())
}
