use super::AppContext;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use review_sync_core::{set_hidden, ModerationError};
use serde_json::json;

pub fn run_moderate(id: i64, hidden: bool, token: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let auth = ctx.admin_auth();
    if !auth.is_configured() {
        output.warn("No administrator token is configured; run 'reviewsync config admin-token <TOKEN>'");
    }

    let mut store = ctx.open_store()?;
    let review = match set_hidden(&mut store, &auth, token.as_deref(), id, hidden) {
        Ok(review) => review,
        Err(ModerationError::Unauthorized) => {
            return Err(color_eyre::eyre::eyre!("Unauthorized: invalid or missing --token"))
        }
        Err(ModerationError::NotFound(id)) => {
            return Err(color_eyre::eyre::eyre!("Review {} not found", id))
        }
        Err(e) => return Err(color_eyre::eyre::eyre!("Failed to update review: {}", e)),
    };

    match output.format() {
        OutputFormat::Human => {
            let verb = if hidden { "hidden" } else { "visible" };
            output.success(format!("Review {} is now {}", review.id, verb));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({"ok": true, "id": review.id, "hidden": review.hidden}));
        }
    }
    Ok(())
}
