use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use kanban::commands::Command;
use kanban::config::{Overrides, Settings};
use kanban::context::BoardContext;
use kanban::error::CliResult;

/// Kanban - an issue board in the terminal
#[derive(Parser)]
#[command(name = "kanban")]
#[command(version = "0.1.0")]
#[command(about = "Prioritized kanban issue board", long_about = None)]
struct Args {
    /// JSON file with the issue list (can also be set via KANBAN_DATA env var)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Acting role: admin or contributor (KANBAN_ROLE)
    #[arg(long, global = true)]
    role: Option<String>,

    /// Acting user name (KANBAN_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Simulated repository latency in milliseconds (KANBAN_LATENCY_MS)
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    /// Make every update call fail, to exercise rollback
    #[arg(long, global = true)]
    fail_updates: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            data: self.data.clone(),
            role: self.role.clone(),
            user: self.user.clone(),
            latency_ms: self.latency_ms,
            fail_updates: self.fail_updates,
        }
    }
}

/// Initialize logging from RUST_LOG, defaulting to warnings only
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    if let Err(e) = run_app().await {
        eprintln!("error: {}", e.full_message());
        process::exit(1);
    }
}

/// Main application logic - separated for testability
async fn run_app() -> CliResult<()> {
    let args = Args::parse();
    run_with_args(&args).await
}

/// Run the application with the given arguments
async fn run_with_args(args: &Args) -> CliResult<()> {
    let Some(cmd) = &args.command else {
        println!("Welcome to Kanban!");
        println!("Use 'kanban --help' for usage information.");
        return Ok(());
    };

    let settings = Settings::resolve(args.overrides())?;
    let ctx = BoardContext::open(&settings)?;
    let output = cmd.execute(&ctx).await?;
    println!("{}", output);

    Ok(())
}
