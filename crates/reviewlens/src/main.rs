mod progress;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reviewlens_common::{logger, AppConfig};
use reviewlens_server::AnalysisWorkflow;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use progress::SpinnerProgress;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "reviewlens")]
#[command(about = "ReviewLens - AI-powered sentiment overview for review CSVs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload page and HTTP API
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze a CSV file and print the report
    Analyze {
        /// CSV file with `review` and `class` columns
        file: PathBuf,
    },
}

async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server_host = host;
    }
    if let Some(port) = port {
        config.server_port = port;
    }

    let log_file = logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("ReviewLens starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Model: {}", config.llm_model);
    tracing::info!("  Log file: {}", log_file.display());

    println!("Server listening on http://{}", config.server_bind_address());

    reviewlens_server::start_server(config).await?;
    Ok(())
}

async fn analyze(config: AppConfig, file: PathBuf) -> Result<()> {
    logger::setup_console_logging(&config.log_level)?;

    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let workflow = AnalysisWorkflow::from_config(&config)?;
    let progress = SpinnerProgress::new();

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let report = workflow.execute(&bytes, &progress, &cancel).await?;
    print!("{}", report::render_report(&report, std::io::stdout().is_terminal()));

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // AppConfig::from_env() also loads .env, but from the working directory only
    load_dotenv_from_project_root();

    let config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(config, host, port).await,
        Some(Commands::Analyze { file }) => analyze(config, file).await,
        None => serve(config, None, None).await,
    }
}
