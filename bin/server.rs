// Review Insights - Web Server
// REST API with Axum over the review engine and the report store

use anyhow::{Context, Result};
use clap::Parser;
use review_insights::api::{router, AppState};
use review_insights::{build_engine, logging, AppConfig, ReportStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "review-server", version, about = "Review analytics HTTP API")]
struct Args {
    /// JSON config file
    #[arg(long, env = "REVIEW_INSIGHTS_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config
    #[arg(long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(addr) = args.addr {
        config.server_addr = addr;
    }
    logging::init(&config.log_level, true);

    println!("🌐 Review Insights - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let engine = build_engine(&config)?;
    let store = ReportStore::open(&config.db_path)
        .with_context(|| format!("Failed to open report store at {:?}", config.db_path))?;
    info!(reports = store.count()?, "report store ready");

    let addr = config.server_addr.clone();
    let app = router(AppState::new(engine, store, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/stats", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}
