// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Onomast Web Checklist
//!
//! Standalone server for the interactive rename-confirmation interface.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use onomast::claude::{ClaudeClient, FallbackProvider, SuggestionProvider};
use onomast::config::AppConfig;
use onomast::extract::ContentExtractor;
use onomast::orchestrator::NamingOrchestrator;
use onomast::web::{self, AppState};
use onomast::Result;

#[derive(Parser, Debug)]
#[command(name = "onomast-web")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Onomast interactive rename checklist")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "onomast.json")]
    config: PathBuf,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Claude API key (falls back to ANTHROPIC_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Open browser automatically
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Onomast Web Checklist v1.0.0");

    // Load config
    let mut config = AppConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(host) = args.host {
        config.web.host = host;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }

    let provider: Arc<dyn SuggestionProvider> = match args
        .api_key
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        .filter(|k| !k.trim().is_empty())
    {
        Some(key) => Arc::new(ClaudeClient::new(&config.api, &key)),
        None => {
            warn!("No API key provided; suggestions will use filename heuristics only");
            Arc::new(FallbackProvider)
        }
    };

    let orchestrator = NamingOrchestrator::new(
        provider,
        Arc::new(ContentExtractor),
        config.rules.skip_files.clone(),
    );

    let state = Arc::new(AppState {
        orchestrator,
        config: config.clone(),
        batch: tokio::sync::Mutex::new(None),
    });

    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    // Open browser if requested
    if args.open {
        let url = format!("http://{}", addr);
        if let Err(e) = open_browser(&url) {
            error!("Failed to open browser: {}", e);
        }
    }

    web::start_server(state).await
}

fn open_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }
    Ok(())
}
