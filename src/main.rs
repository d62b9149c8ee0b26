// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Onomast CLI: Claude-Assisted Document Renamer
//!
//! Scans a directory, proposes convention-compliant names for every
//! supported document, asks for confirmation, and renames in place.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use onomast::claude::{ClaudeClient, FallbackProvider, SuggestionProvider};
use onomast::config::AppConfig;
use onomast::extract::ContentExtractor;
use onomast::history::History;
use onomast::naming::form::DOCUMENT_FORMS;
use onomast::orchestrator::NamingOrchestrator;
use onomast::{OnomastError, Result};

/// Onomast CLI - Claude-Assisted Document Renamer
#[derive(Parser, Debug)]
#[command(name = "onomast")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Rename documents using a standardized naming convention", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "onomast.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for plan results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rename files in a directory after confirmation
    Run {
        /// Directory containing files to rename
        directory: PathBuf,

        /// Automatically proceed without confirmation
        #[arg(short, long)]
        yes: bool,

        /// Dry run mode (show renames without performing them)
        #[arg(long)]
        dry_run: bool,

        /// Claude API key (falls back to ANTHROPIC_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Skip the remote suggestion service entirely
        #[arg(long)]
        offline: bool,
    },

    /// Show the proposed renames without touching anything
    Plan {
        /// Directory containing files to analyze
        directory: PathBuf,

        /// Claude API key (falls back to ANTHROPIC_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Skip the remote suggestion service entirely
        #[arg(long)]
        offline: bool,
    },

    /// List the document form codes of the naming convention
    Forms,

    /// History and undo operations
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Check Anthropic API reachability
    Status {
        /// Claude API key (falls back to ANTHROPIC_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List recent history entries
    List {
        /// Number of entries to show
        #[arg(long, default_value = "10")]
        count: usize,
    },

    /// Undo recent renames
    Undo {
        /// Number of renames to undo
        #[arg(long, default_value = "1")]
        count: usize,

        /// Dry run (show what would be undone)
        #[arg(long)]
        dry_run: bool,
    },

    /// Clear all history
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "onomast.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Run {
            directory,
            yes,
            dry_run,
            api_key,
            offline,
        } => run_rename(config, directory, yes, dry_run, api_key, offline).await,
        Commands::Plan {
            directory,
            api_key,
            offline,
        } => run_plan(config, directory, api_key, offline, &cli.format).await,
        Commands::Forms => run_forms(),
        Commands::History { action } => run_history_command(config, action).await,
        Commands::Config { action } => run_config_command(config, action, &cli.config).await,
        Commands::Status { api_key } => run_status(config, api_key).await,
    }
}

/// Resolve an API key from the flag or the environment.
fn resolve_api_key(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        .filter(|k| !k.trim().is_empty())
}

/// Build the suggestion provider: Claude when a key is available, the
/// deterministic fallback otherwise. Either way the output shape is the
/// same, so every downstream step is identical.
fn build_provider(
    config: &AppConfig,
    api_key: Option<String>,
    offline: bool,
) -> Arc<dyn SuggestionProvider> {
    if offline {
        info!("Offline mode: using the deterministic fallback namer");
        return Arc::new(FallbackProvider);
    }

    match resolve_api_key(api_key) {
        Some(key) => Arc::new(ClaudeClient::new(&config.api, &key)),
        None => {
            warn!("No API key provided; falling back to filename heuristics");
            warn!("Set ANTHROPIC_API_KEY or pass --api-key for Claude suggestions");
            Arc::new(FallbackProvider)
        }
    }
}

fn build_orchestrator(config: &AppConfig, provider: Arc<dyn SuggestionProvider>) -> NamingOrchestrator {
    NamingOrchestrator::new(
        provider,
        Arc::new(ContentExtractor),
        config.rules.skip_files.clone(),
    )
}

/// The main rename flow: plan, confirm, execute, report counts.
async fn run_rename(
    config: AppConfig,
    directory: PathBuf,
    yes: bool,
    dry_run: bool,
    api_key: Option<String>,
    offline: bool,
) -> Result<()> {
    if !directory.is_dir() {
        return Err(OnomastError::Config(format!(
            "Not a directory: {}",
            directory.display()
        )));
    }

    info!("Analyzing files in: {}", directory.display());

    let provider = build_provider(&config, api_key, offline);
    let orchestrator = build_orchestrator(&config, provider);
    let plans = orchestrator.plan_directory(&directory).await?;

    if plans.is_empty() {
        println!("No files found to rename. Try adding some files to the directory.");
        return Ok(());
    }

    println!("\nProposed file renaming:");
    println!("======================");
    for plan in &plans {
        let from = plan
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("\nFrom: {}", from);
        println!("To:   {}", plan.new_name);
        println!("Reason: {}", plan.reason);
    }

    if !yes && !dry_run && !confirm("\nProceed with renaming these files? (y/n): ")? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let history = History::new(PathBuf::from(&config.history_file));
    let outcome = NamingOrchestrator::execute(&plans, &history, dry_run);

    if dry_run {
        println!("\nDry run: {} files would be renamed.", outcome.renamed);
    } else {
        println!(
            "\nRenamed {} files successfully. {} files failed.",
            outcome.renamed, outcome.failed
        );
    }

    Ok(())
}

/// Dry-run analysis with selectable output format.
async fn run_plan(
    config: AppConfig,
    directory: PathBuf,
    api_key: Option<String>,
    offline: bool,
    format: &str,
) -> Result<()> {
    let provider = build_provider(&config, api_key, offline);
    let orchestrator = build_orchestrator(&config, provider);
    let plans = orchestrator.plan_directory(&directory).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
        "jsonl" => {
            for plan in &plans {
                println!("{}", serde_json::to_string(plan)?);
            }
        }
        _ => {
            for plan in &plans {
                let from = plan
                    .source_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                println!("{} -> {}", from, plan.new_name);
                println!("    {}", plan.reason);
            }
            println!("\nPlanned {} renames", plans.len());
        }
    }

    Ok(())
}

/// Print the document form code table.
fn run_forms() -> Result<()> {
    println!("Document form codes:");
    for (code, description) in DOCUMENT_FORMS {
        println!("  {}  {}", code, description);
    }
    Ok(())
}

/// Run history commands
async fn run_history_command(config: AppConfig, action: HistoryCommands) -> Result<()> {
    let history = History::new(PathBuf::from(&config.history_file));

    match action {
        HistoryCommands::List { count } => {
            let entries = history.get_recent(count)?;
            println!("Recent history ({} entries):", entries.len());
            for entry in entries {
                let status = if entry.undone { "[UNDONE]" } else { "" };
                println!(
                    "  {} {} -> {} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.original_path.display(),
                    entry.new_path.display(),
                    status
                );
            }
        }
        HistoryCommands::Undo { count, dry_run } => {
            let entries = history.get_undoable()?;
            let to_undo: Vec<_> = entries.into_iter().rev().take(count).collect();

            if to_undo.is_empty() {
                println!("No renames to undo");
                return Ok(());
            }

            for entry in to_undo {
                if entry.new_path.exists() {
                    if dry_run {
                        println!(
                            "Would undo: {} -> {}",
                            entry.new_path.display(),
                            entry.original_path.display()
                        );
                    } else {
                        std::fs::rename(&entry.new_path, &entry.original_path)?;
                        history.mark_undone(&entry.id)?;
                        println!(
                            "Undone: {} -> {}",
                            entry.new_path.display(),
                            entry.original_path.display()
                        );
                    }
                } else {
                    warn!(
                        "File not found (may have been moved/deleted): {:?}",
                        entry.new_path
                    );
                }
            }
        }
        HistoryCommands::Clear { force } => {
            if !force {
                eprintln!("Use --force to confirm clearing history");
                return Ok(());
            }
            history.clear()?;
            println!("History cleared");
        }
    }

    Ok(())
}

/// Run config commands
async fn run_config_command(
    config: AppConfig,
    action: ConfigCommands,
    config_path: &Path,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            let default_config = AppConfig::default();
            default_config.save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            println!("Configuration at {:?} is valid", config_path);
            println!("  Model: {}", config.api.model);
            println!("  API URL: {}", config.api.url);
            println!("  History file: {}", config.history_file);
        }
    }

    Ok(())
}

/// Run status check
async fn run_status(config: AppConfig, api_key: Option<String>) -> Result<()> {
    println!("Onomast v1.0.0 Status");
    println!("=====================");

    match resolve_api_key(api_key) {
        Some(key) => {
            let client = ClaudeClient::new(&config.api, &key);
            match client.health_check().await {
                Ok(()) => println!("Anthropic API: Reachable"),
                Err(e) => println!("Anthropic API: Error - {}", e),
            }
        }
        None => {
            println!("Anthropic API: No key configured (fallback naming only)");
        }
    }

    println!("\nConfiguration:");
    println!("  Model: {}", config.api.model);
    println!("  API URL: {}", config.api.url);
    println!("  Retries: {}", config.api.retries);
    println!("  History file: {}", config.history_file);

    Ok(())
}

/// Ask a yes/no question on stdin.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_run_command() {
        let cli = Cli::try_parse_from(["onomast", "run", "/tmp/docs", "--yes", "--offline"]).unwrap();

        match cli.command {
            Commands::Run {
                directory,
                yes,
                offline,
                ..
            } => {
                assert!(yes);
                assert!(offline);
                assert_eq!(directory, PathBuf::from("/tmp/docs"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_plan_with_format() {
        let cli =
            Cli::try_parse_from(["onomast", "--format", "jsonl", "plan", "/tmp/docs"]).unwrap();
        assert_eq!(cli.format, "jsonl");
        assert!(matches!(cli.command, Commands::Plan { .. }));
    }

    #[test]
    fn test_cli_history_undo() {
        let cli =
            Cli::try_parse_from(["onomast", "history", "undo", "--count", "3", "--dry-run"])
                .unwrap();

        match cli.command {
            Commands::History {
                action: HistoryCommands::Undo { count, dry_run },
            } => {
                assert_eq!(count, 3);
                assert!(dry_run);
            }
            _ => panic!("Expected History Undo command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_format() {
        assert!(Cli::try_parse_from(["onomast", "--format", "xml", "forms"]).is_err());
    }
}
