use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use review_sync_core::{list_reviews, refresh_and_list, ListQuery, ModerationError};

pub async fn run_list(
    include_hidden: bool,
    token: Option<String>,
    no_refresh: bool,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    let auth = ctx.admin_auth();
    let mut store = ctx.open_store()?;
    let query = ListQuery {
        include_hidden,
        token,
    };

    let result = if no_refresh {
        list_reviews(&store, &query, &auth)
    } else {
        let pipeline = ctx.pipeline();
        refresh_and_list(&pipeline, &mut store, &query, &auth)
            .await
            .map(|(report, reviews)| {
                for error in &report.errors {
                    tracing::warn!("Refresh problem: {}", error);
                }
                reviews
            })
    };

    match result {
        Ok(reviews) => {
            output.reviews(&reviews);
            Ok(())
        }
        Err(ModerationError::Unauthorized) => {
            Err(color_eyre::eyre::eyre!("Unauthorized: --include-hidden requires a valid --token"))
        }
        Err(e) => Err(color_eyre::eyre::eyre!("Failed to list reviews: {}", e)),
    }
}
