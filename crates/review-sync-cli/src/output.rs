use clap::ValueEnum;
use comfy_table::{presets, Cell, Table};
use owo_colors::OwoColorize;
use review_sync_models::ReviewRecord;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", msg.as_ref(), |m| println!("{} {}", "✓".green(), m));
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message("info", msg.as_ref(), |m| println!("{}", m));
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", msg.as_ref(), |m| println!("{} {}", "⚠".yellow(), m));
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "error", "message": msg.as_ref()}));
            }
        }
    }

    fn message(&self, kind: &str, msg: &str, human: impl FnOnce(&str)) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => human(msg),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": kind, "message": msg}));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default())
            }
            OutputFormat::Human => println!("{}", data),
        }
    }

    pub fn reviews(&self, reviews: &[ReviewRecord]) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                if reviews.is_empty() {
                    println!("{}", "No reviews".bright_black());
                    return;
                }
                println!("{}", review_table(reviews));
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let value = serde_json::to_value(reviews).unwrap_or_default();
                self.json(&json!({"status": "success", "result": value}));
            }
        }
    }
}

fn review_table(reviews: &[ReviewRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        ["ID", "Channel", "Type", "Rating", "Guest", "Listing", "Submitted", "Hidden"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(comfy_table::Attribute::Bold)),
    );

    for review in reviews {
        table.add_row(vec![
            Cell::new(review.id),
            Cell::new(review.channel.as_deref().unwrap_or("-")),
            Cell::new(&review.review_type),
            Cell::new(review.rating.map_or_else(|| "-".to_string(), |r| r.to_string())),
            Cell::new(&review.guest_name),
            Cell::new(&review.listing_name),
            Cell::new(&review.submitted_at),
            Cell::new(if review.hidden { "yes" } else { "" }),
        ]);
    }
    table
}
