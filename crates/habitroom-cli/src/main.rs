use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "habitroom-cli", version, about = "Habitroom CLI")]
struct Cli {
    /// Use this config file instead of ~/.config/habitroom/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: timers run in real time, intents are read from stdin
    Run,
    /// Replay a script of intents against simulated time
    Simulate(commands::simulate::SimulateArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let store = commands::config::ConfigStore::new(cli.config);
    let config = store.load_or_default();
    logging::init(&config.log.filter);

    let result = match cli.command {
        Commands::Run => commands::run::run(&config),
        Commands::Simulate(args) => commands::simulate::run(args, &config),
        Commands::Config { action } => commands::config::run(action, &store),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
