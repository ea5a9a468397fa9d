use super::AppContext;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use review_sync_config::{CredentialStore, ProviderConfig};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::AdminToken { token } => store_secret("Administrator token", token, output, |creds, t| {
            creds.set_admin_token(t)
        }),
        ConfigCommands::GoogleRefreshToken { token } => {
            store_secret("Google refresh token", token, output, |creds, t| {
                creds.set_google_refresh_token(t)
            })
        }
    }
}

fn store_secret(
    label: &str,
    token: String,
    output: &Output,
    set: impl FnOnce(&mut CredentialStore, String),
) -> Result<()> {
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(color_eyre::eyre::eyre!("{} cannot be blank", label));
    }

    let mut ctx = AppContext::load()?;
    set(&mut ctx.credentials, token);
    ctx.credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    output.success(format!(
        "{} saved to {}",
        label,
        ctx.paths.credentials_file().display()
    ));
    Ok(())
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let config = &ctx.config;
    let mask = |s: &str| if full { s.to_string() } else { mask_string(s) };
    let admin_token = config
        .admin
        .token
        .clone()
        .or_else(|| ctx.credentials.get_admin_token().cloned())
        .unwrap_or_default();
    let refresh_token = ctx
        .credentials
        .get_google_refresh_token()
        .cloned()
        .unwrap_or_default();
    let store_path = config.store_path(ctx.paths.store_file());
    let dataset_path = config.dataset_path(ctx.paths.dataset_file());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut files = Table::new();
            files.load_preset(comfy_table::presets::UTF8_FULL);
            files.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            files.set_header(vec![
                Cell::new("Files").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold),
                Cell::new(""),
            ]);
            files.add_row(vec![Cell::new("Config"), Cell::new(ctx.paths.config_file().display())]);
            files.add_row(vec![Cell::new("Credentials"), Cell::new(ctx.paths.credentials_file().display())]);
            files.add_row(vec![Cell::new("Store"), Cell::new(store_path.display())]);
            files.add_row(vec![Cell::new("Dataset"), Cell::new(dataset_path.display())]);
            println!("{}", files);
            println!();

            println!("{}", provider_table("Hostaway", &config.providers.hostaway, &mask, Vec::new()));
            println!();

            let google = &config.providers.google;
            let extra = vec![
                ("Account ID", google.account_id.clone()),
                ("Locations", if google.location_names.is_empty() {
                    "all".to_string()
                } else {
                    google.location_names.join(", ")
                }),
                ("Refresh Token", mask(&refresh_token)),
            ];
            println!("{}", provider_table("Google Business Profile", &google.provider, &mask, extra));
            println!();

            if admin_token.is_empty() {
                println!("{}", "Admin token: not set (moderation disabled)".bright_black());
            } else {
                println!("Admin token: {}", mask(&admin_token));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let provider_json = |p: &ProviderConfig| {
                json!({
                    "enabled": p.enabled,
                    "configured": p.is_configured(),
                    "endpoint_url": p.endpoint_url,
                    "auth_url": p.auth_url,
                    "client_id": mask(&p.client_id),
                    "client_secret": mask(&p.client_secret),
                    "timeout_secs": p.timeout_secs,
                })
            };
            output.json(&json!({
                "config_file": ctx.paths.config_file(),
                "store": store_path,
                "dataset": dataset_path,
                "providers": {
                    "hostaway": provider_json(&config.providers.hostaway),
                    "google": {
                        "provider": provider_json(&config.providers.google.provider),
                        "account_id": config.providers.google.account_id,
                        "location_names": config.providers.google.location_names,
                        "refresh_token": mask(&refresh_token),
                    },
                },
                "admin_token": mask(&admin_token),
                "configured_providers": config.configured_providers(),
            }));
        }
    }

    Ok(())
}

fn provider_table(
    title: &str,
    provider: &ProviderConfig,
    mask: &dyn Fn(&str) -> String,
    extra: Vec<(&str, String)>,
) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new(title).fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold),
        Cell::new(""),
    ]);
    let status = if provider.is_configured() {
        "✓ configured".green().to_string()
    } else if provider.enabled {
        "✗ missing credentials".red().to_string()
    } else {
        "disabled".bright_black().to_string()
    };
    table.add_row(vec![Cell::new("Status"), Cell::new(status)]);
    table.add_row(vec![Cell::new("Endpoint"), Cell::new(&provider.endpoint_url)]);
    table.add_row(vec![Cell::new("Client ID"), Cell::new(mask(&provider.client_id))]);
    table.add_row(vec![Cell::new("Client Secret"), Cell::new(mask(&provider.client_secret))]);
    table.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", provider.timeout_secs))]);
    for (label, value) in extra {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
