//! Student Handbook Helpdesk CLI
//!
//! Main entry point for the helpdesk command-line tool.
//! Answers handbook questions and manages the FAQ collection.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, FaqCommand, FeedbackCommand, ImportCommand, StatsCommand};
use helpdesk_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Student Handbook Helpdesk - answers grounded in curated FAQs
#[derive(Parser, Debug)]
#[command(name = "helpdesk")]
#[command(about = "Student handbook helpdesk backed by curated FAQs", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "HELPDESK_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "HELPDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Completion provider (openrouter, openai)
    #[arg(short, long, global = true, env = "HELPDESK_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "HELPDESK_MODEL")]
    model: Option<String>,

    /// Signed-in user id (admin commands)
    #[arg(short, long, global = true, env = "HELPDESK_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question about the student handbook
    Ask(AskCommand),

    /// Rate an answer
    Feedback(FeedbackCommand),

    /// Browse and curate FAQ entries
    Faq(FaqCommand),

    /// Show usage statistics (admin)
    Stats(StatsCommand),

    /// Import FAQ entries from data/faqs.json
    Import(ImportCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides; a different workspace or config file is re-read
    let reload = cli.workspace.is_some() || cli.config.is_some();
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        None,
        None,
        None,
        None,
        false,
        false,
    );
    let config = if reload { config.load_file()? } else { config };
    let config = config.with_overrides(
        None,
        None,
        cli.provider,
        cli.model,
        cli.user,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_format)?;

    // Log startup
    tracing::info!("Helpdesk CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    // Ensure .helpdesk directory exists
    config.ensure_helpdesk_dir()?;

    // Emit command span
    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Feedback(_) => "feedback",
        Commands::Faq(cmd) => cmd.name(),
        Commands::Stats(_) => "stats",
        Commands::Import(_) => "import",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Feedback(cmd) => cmd.execute(&config).await,
        Commands::Faq(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
        Commands::Import(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
