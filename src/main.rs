use anyhow::Result;
use clap::{Parser, Subcommand};

use fraudlens::cli;

#[derive(Debug, Parser)]
#[command(name = "fraudlens")]
#[command(about = "AI credit card fraud analysis dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the dashboard web server
    Serve {
        /// Listen address (default from config: 127.0.0.1:9750)
        #[arg(long)]
        listen: Option<String>,
        /// Dataset directory (default from config: ./data)
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Print the dataset summary sent to the assistant
    Summary {
        /// Dataset directory
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Ask the assistant a one-shot question about the dataset
    Ask {
        /// The question to ask
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
        /// Dataset directory
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Show conversation turn statistics
    Stats {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check system health: config, API, dataset
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective (fully resolved) configuration
    Show,
    /// Write the annotated default config to ~/.fraudlens/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a config key (dotted form, e.g. chat.poll_max_wait_ms)
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { listen, data_dir } => cli::run_serve(listen, data_dir),
        Commands::Summary { data_dir } => cli::run_summary(data_dir),
        Commands::Ask { question, data_dir } => {
            let question = question.join(" ");
            cli::run_ask(&question, data_dir)
        }
        Commands::Stats { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigCommands::Show => cli::run_config_show(),
            ConfigCommands::Init { force } => cli::run_config_init(force),
            ConfigCommands::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigCommands::Reset => cli::run_config_reset(),
        },
    }
}
