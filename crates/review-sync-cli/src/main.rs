use clap::{ArgAction, Parser, Subcommand};
use commands::{config, list, moderate, refresh, seed};
use review_sync_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reviewsync")]
#[command(about = "ReviewSync - Normalize and reconcile guest reviews from every channel")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily rotated file instead of stderr (defaults to the log directory)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed an empty store from the local dataset, then refresh it from the dataset
    #[command(long_about = "Populate the review store from the local dataset when the store is empty, then reconcile the dataset into the store so edits to the file are picked up. Records are never deleted.")]
    Seed {
        /// Dataset file (defaults to the configured dataset path)
        #[arg(long, value_name = "PATH")]
        dataset: Option<PathBuf>,
    },
    /// Fetch reviews from every configured provider and upsert them
    Refresh,
    /// Refresh, then list stored reviews newest first
    List {
        /// Include reviews hidden by an administrator (requires --token)
        #[arg(long, action = ArgAction::SetTrue)]
        include_hidden: bool,

        /// Administrator token
        #[arg(long, env = "REVIEWSYNC_TOKEN")]
        token: Option<String>,

        /// Skip the provider refresh and list the store as is
        #[arg(long, action = ArgAction::SetTrue)]
        no_refresh: bool,
    },
    /// Hide a review from the public listing
    Hide {
        /// Review id (Google reviews have negative ids)
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Administrator token
        #[arg(long, env = "REVIEWSYNC_TOKEN")]
        token: Option<String>,
    },
    /// Make a hidden review public again
    Show {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Administrator token
        #[arg(long, env = "REVIEWSYNC_TOKEN")]
        token: Option<String>,
    },
    /// Inspect configuration and store secrets
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the administrator token in the credentials file
    AdminToken { token: String },
    /// Store the Google Business Profile OAuth refresh token
    GoogleRefreshToken { token: String },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| PathManager::default().log_file()));
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Seed { dataset } => seed::run_seed(dataset, &output),
        Commands::Refresh => refresh::run_refresh(&output).await,
        Commands::List {
            include_hidden,
            token,
            no_refresh,
        } => list::run_list(include_hidden, token, no_refresh, &output).await,
        Commands::Hide { id, token } => moderate::run_moderate(id, true, token, &output),
        Commands::Show { id, token } => moderate::run_moderate(id, false, token, &output),
        Commands::Config { cmd } => config::run_config(cmd, &output),
    };

    // JSON consumers get the failure on stdout as an error message
    match result {
        Err(e) if output.format() != output::OutputFormat::Human => {
            output.error(format!("{:#}", e));
            std::process::exit(1);
        }
        other => other,
    }
}
