use super::AppContext;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use review_sync_core::RefreshReport;

pub async fn run_refresh(output: &Output) -> Result<()> {
    tracing::debug!("Refresh command started");

    let ctx = AppContext::load()?;
    let configured = ctx.config.configured_providers();
    if configured.is_empty() {
        output.warn("No providers are configured; nothing will be fetched");
    }

    let mut store = ctx.open_store()?;
    let report = ctx.pipeline().refresh(&mut store).await;
    print_report(&report, output);
    Ok(())
}

pub fn print_report(report: &RefreshReport, output: &Output) {
    match output.format() {
        OutputFormat::Human => {
            for provider in &report.providers {
                output.info(format!(
                    "  {}: {} ({} fetched)",
                    provider.provider, provider.outcome, provider.fetched
                ));
            }
            for error in &report.errors {
                output.warn(error);
            }
            output.success(format!(
                "Refresh completed: {} created, {} updated in {:.2}s",
                report.created,
                report.updated,
                report.duration.as_secs_f64()
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(report).unwrap_or_default());
        }
    }
}
