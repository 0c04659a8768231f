use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod notifier;

#[derive(Parser)]
#[command(name = "wakequest", version, about = "WakeQuest CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Alarm lifecycle
    Alarm {
        #[command(subcommand)]
        action: commands::alarm::AlarmAction,
    },
    /// Ring cycle: due triggers, fire, snooze
    Ring {
        #[command(subcommand)]
        action: commands::ring::RingAction,
    },
    /// Math mission for a ringing alarm
    Mission {
        #[command(subcommand)]
        action: commands::mission::MissionAction,
    },
    /// Player progression
    Player {
        #[command(subcommand)]
        action: commands::player::PlayerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Reconcile the schedule map against installed triggers
    Audit,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Alarm { action } => commands::alarm::run(action),
        Commands::Ring { action } => commands::ring::run(action),
        Commands::Mission { action } => commands::mission::run(action),
        Commands::Player { action } => commands::player::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Audit => commands::audit::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
