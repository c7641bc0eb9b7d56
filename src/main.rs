mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ritmo_core::config::RitmoConfig;
use ritmo_core::date_range::DateRange;

#[derive(Parser)]
#[command(name = "ritmo")]
#[command(about = "Browse and manage your ritmo wellness calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show upcoming occurrences, day by day
    Agenda {
        /// Show occurrences from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show occurrences until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Create a new event
    New {
        /// Event title
        title: String,

        /// Start date/time (e.g., "2025-03-20" or "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time (defaults to one hour after start)
        #[arg(short, long)]
        end: Option<String>,

        /// Repeat frequency: daily, weekly, monthly or custom
        #[arg(short, long)]
        repeat: Option<String>,

        /// Units between occurrences (e.g., every 2 weeks)
        #[arg(long, default_value_t = 1)]
        every: u32,

        /// Comma-separated weekday ordinals for custom repeats
        /// (0=Sunday..6=Saturday)
        #[arg(long)]
        days: Option<String>,

        /// Last date the repeat can fall on (YYYY-MM-DD, inclusive)
        #[arg(long)]
        until: Option<String>,
    },
    /// Mark an event series as completed
    Done {
        /// Event definition id
        id: String,
    },
    /// Delete an event
    Rm {
        /// Event definition id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = require_config()?;

    match cli.command {
        Commands::Agenda { from, to } => {
            let range = DateRange::from_args(from.as_deref(), to.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;
            commands::agenda::run(&config, range).await
        }
        Commands::New {
            title,
            start,
            end,
            repeat,
            every,
            days,
            until,
        } => {
            let args = commands::new::NewEvent {
                title,
                start,
                end,
                repeat,
                every,
                days,
                until,
            };
            commands::new::run(&config, args).await
        }
        Commands::Done { id } => commands::done::run(&config, &id).await,
        Commands::Rm { id } => commands::rm::run(&config, &id).await,
    }
}

fn require_config() -> Result<RitmoConfig> {
    match RitmoConfig::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            let path = RitmoConfig::config_path()?;
            if !path.exists() {
                RitmoConfig::create_default_config(&path)?;
                anyhow::bail!(
                    "No configuration found. A starter file was written to {}; set user_id there first.",
                    path.display()
                );
            }
            Err(e.into())
        }
    }
}
