use clap::{Parser, Subcommand};
use ev_analytics::commands::{
    Command, CreateCommand, DashboardCommand, DataCommand, MetadataCommand, StatusCommand,
};
use ev_analytics::context::AppContext;
use ev_analytics::context::config::AppConfig;
use ev_analytics::logging::{LogTarget, init_logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eva")]
#[command(author, version, about = "EV Analytics - trigger analytics tasks and chart their results", long_about = None)]
struct Cli {
    /// Base URL of the analytics backend (overrides the config file)
    #[arg(long, global = true, env = "EVA_BASE_URL")]
    base_url: Option<String>,

    /// Path to a config.toml (defaults to ~/.config/ev-analytics/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard
    Dashboard {
        /// Make to include in new tasks (repeatable; defaults to the configured makes)
        #[arg(short, long = "make")]
        makes: Vec<String>,

        /// Write logs to this file while the dashboard is open
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// List the dataset's columns
    Metadata {
        /// Print raw JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Create a new analytics task
    Create {
        /// Make to include (repeatable; defaults to the configured makes)
        #[arg(short, long = "make")]
        makes: Vec<String>,
    },
    /// Check a task's status, fetching and charting its data once completed
    Status {
        /// Task ID returned by `create`
        task_id: String,
    },
    /// Fetch and chart a task's data without checking its status
    Data {
        /// Task ID returned by `create`
        task_id: String,

        /// Print raw JSON rows instead of charts
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_target = match &cli.command {
        Commands::Dashboard {
            log_file: Some(path),
            ..
        } => LogTarget::File(path.clone()),
        Commands::Dashboard { log_file: None, .. } => LogTarget::Discard,
        _ => LogTarget::Stderr,
    };
    if let Err(e) = init_logging(cli.verbose, log_target) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_base_url(cli.base_url),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let ctx = match AppContext::builder().with_config(config).build() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let command: Box<dyn Command> = match cli.command {
        Commands::Dashboard { makes, .. } => Box::new(DashboardCommand { makes }),
        Commands::Metadata { json } => Box::new(MetadataCommand { json }),
        Commands::Create { makes } => Box::new(CreateCommand { makes }),
        Commands::Status { task_id } => Box::new(StatusCommand { task_id }),
        Commands::Data { task_id, json } => Box::new(DataCommand { task_id, json }),
    };

    if let Err(e) = command.execute(&ctx).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
