mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{buddy::BuddySubcommand, config::ConfigSubcommand, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "carebuddy",
    about = "Doctor console for CareBuddy assistants",
    version,
    propagate_version = true
)]
struct Cli {
    /// Console root (default: auto-detect from .carebuddy/)
    #[arg(long, global = true, env = "CAREBUDDY_ROOT")]
    root: Option<PathBuf>,

    /// Backend API base URL (overrides .carebuddy/config.yaml)
    #[arg(long, global = true, env = "CAREBUDDY_API_URL")]
    api_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, inspect, and create buddies
    Buddy {
        #[command(subcommand)]
        subcommand: BuddySubcommand,
    },

    /// Show aggregate impact across all buddies
    Impact {
        /// Reporting period: today, week, or month (default from config)
        #[arg(long)]
        period: Option<String>,
    },

    /// Manage console configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let session = Session {
        root,
        api_url: cli.api_url,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Buddy { subcommand } => cmd::buddy::run(&session, subcommand),
        Commands::Impact { period } => cmd::impact::run(&session, period.as_deref()),
        Commands::Config { subcommand } => cmd::config::run(&session, subcommand),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
