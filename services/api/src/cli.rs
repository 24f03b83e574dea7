use crate::demo::{run_catalog_query, run_demo, run_submission_queue, CatalogArgs, DemoArgs, QueueArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use listing_catalog::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Listing Catalog",
    about = "Browse the property catalog and moderate owner submissions from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the visible catalog, optionally filtered
    Catalog(CatalogArgs),
    /// Print the moderation queue
    Submissions(QueueArgs),
    /// Walk through intake, approval, and browsing on an in-memory store
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

/// Storage overrides shared by every command that opens the catalog.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct StorageArgs {
    /// JSON file holding owner submissions
    #[arg(long)]
    pub(crate) submissions: Option<PathBuf>,
    /// CSV file with the curated baseline catalog
    #[arg(long)]
    pub(crate) baseline: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog(args) => run_catalog_query(args),
        Command::Submissions(args) => run_submission_queue(args),
        Command::Demo(args) => run_demo(args),
    }
}
