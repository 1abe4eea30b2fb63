//! CLI command implementations for fraudlens.
//!
//! Provides subcommand handlers for:
//! - `fraudlens serve` — start the dashboard web server
//! - `fraudlens summary` — print the dataset summary sent to the assistant
//! - `fraudlens ask "question"` — one-shot conversation turn
//! - `fraudlens stats` — turn log aggregates
//! - `fraudlens health` — check config, API, dataset
//! - `fraudlens config show|init|set|reset` — configuration management

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::{logger, reporter};
use crate::assistant::client::AssistantClient;
use crate::assistant::configure::configure;
use crate::chat::driver::PollPolicy;
use crate::chat::{ChatSession, SessionLog};
use crate::config::{self, FraudlensConfig};
use crate::dataset::{self, Dataset};
use crate::dataset::summary::format_summary;
use crate::web::{self, AppState};

/// Output format for analytics commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// fraudlens serve
// ---------------------------------------------------------------------------

/// Full startup sequence, then the blocking web server.
///
/// Dataset loading is fatal; assistant setup is not — the dashboard and
/// data explorer still render when the remote service is unavailable, with
/// chat degraded to the fallback reply.
pub fn run_serve(listen: Option<String>, data_dir: Option<String>) -> Result<()> {
    let mut config = config::load();
    if let Some(dir) = data_dir {
        config.data.dir = dir;
    }
    if let Some(addr) = listen {
        config.server.listen = addr;
    }

    let dataset = load_dataset(&config)?;
    let summary = format_summary(&dataset);
    println!(
        "Loaded {} ({} rows, {} columns)",
        dataset.source.display(),
        dataset.row_count(),
        dataset.column_count()
    );

    let assistant = connect_assistant(&config, &summary);
    if assistant.configure_error.is_none() && assistant.session_error.is_none() {
        println!("{}", "Assistant updated with dataset information.".green());
    }
    for err in assistant
        .configure_error
        .iter()
        .chain(assistant.session_error.iter())
    {
        println!("{} {}", "warning:".yellow().bold(), err);
    }

    let addr = config.server.listen.clone();
    let state = AppState {
        config,
        dataset,
        summary,
        client: assistant.client,
        session: assistant.session,
        log: SessionLog::new(),
        configure_error: assistant.configure_error,
        session_error: assistant.session_error,
    };

    web::serve(&addr, state)
}

/// Result of the best-effort assistant setup at startup.
struct AssistantSetup {
    client: Option<AssistantClient>,
    session: Option<ChatSession>,
    /// Instructions push failed (chat may still work, ungrounded).
    configure_error: Option<String>,
    /// Chat is unavailable: missing settings or thread creation failed.
    session_error: Option<String>,
}

fn connect_assistant(config: &FraudlensConfig, summary: &str) -> AssistantSetup {
    if !config.api.is_complete() {
        return AssistantSetup {
            client: None,
            session: None,
            configure_error: None,
            session_error: Some(
                "assistant not configured: set FRAUDLENS_API_KEY and api.assistant_id".to_string(),
            ),
        };
    }

    let client = AssistantClient::from_config(&config.api);

    let configure_error = configure(&client, &config.api.assistant_id, summary)
        .err()
        .map(|e| e.to_string());

    let policy = PollPolicy::from_config(&config.chat);
    let (session, session_error) =
        match ChatSession::start(&client, &config.api.assistant_id, policy) {
            Ok(session) => (Some(session), None),
            Err(e) => (None, Some(format!("failed to start conversation: {e}"))),
        };

    AssistantSetup {
        client: Some(client),
        session,
        configure_error,
        session_error,
    }
}

fn load_dataset(config: &FraudlensConfig) -> Result<Dataset> {
    dataset::load_dir(Path::new(&config.data.dir)).context("error loading data")
}

// ---------------------------------------------------------------------------
// fraudlens summary
// ---------------------------------------------------------------------------

/// Print the dataset summary exactly as it is sent to the assistant.
pub fn run_summary(data_dir: Option<String>) -> Result<()> {
    let mut config = config::load();
    if let Some(dir) = data_dir {
        config.data.dir = dir;
    }

    let dataset = load_dataset(&config)?;
    print!("{}", format_summary(&dataset));
    Ok(())
}

// ---------------------------------------------------------------------------
// fraudlens ask
// ---------------------------------------------------------------------------

/// One-shot question: load, summarize, configure, create a thread, send
/// one turn, print the reply.
pub fn run_ask(question: &str, data_dir: Option<String>) -> Result<()> {
    let mut config = config::load();
    if let Some(dir) = data_dir {
        config.data.dir = dir;
    }

    let dataset = load_dataset(&config)?;
    let summary = format_summary(&dataset);

    if !config.api.is_complete() {
        anyhow::bail!(
            "assistant not configured: set FRAUDLENS_API_KEY and api.assistant_id \
             (see `fraudlens config show`)"
        );
    }

    let client = AssistantClient::from_config(&config.api);
    if let Err(e) = configure(&client, &config.api.assistant_id, &summary) {
        println!("{} {}", "warning:".yellow().bold(), e);
    }

    let policy = PollPolicy::from_config(&config.chat);
    let session = ChatSession::start(&client, &config.api.assistant_id, policy)
        .map_err(|e| anyhow::anyhow!("failed to start conversation: {e}"))?;

    let start = Instant::now();
    let outcome = session.send(&client, question);
    let latency_ms = start.elapsed().as_millis() as u64;

    let error_text = outcome.error.as_ref().map(|e| e.to_string());
    logger::log_turn(
        question.chars().count(),
        outcome.reply.chars().count(),
        latency_ms,
        error_text.as_deref(),
    );

    println!("{}", outcome.reply);
    if let Some(err) = error_text {
        eprintln!("{} {}", "error:".red().bold(), err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// fraudlens stats
// ---------------------------------------------------------------------------

/// Show turn statistics from the turn log.
pub fn run_stats(format: OutputFormat) -> Result<()> {
    let stats = reporter::compute_stats();

    if stats.total_turns == 0 {
        println!(
            "{}",
            "No data yet. Ask the assistant some questions to see stats.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => {
            println!("{}", "Conversation Turn Report".bold().cyan());
            println!("{}", "=".repeat(40));
            println!();
            println!("  {} {}", "Total turns:  ".bold(), stats.total_turns);
            println!("  {} {}", "Answered:     ".bold(), stats.ok_turns);
            println!(
                "  {} {} ({:.1}%)",
                "Fallbacks:    ".bold(),
                stats.fallback_turns,
                stats.fallback_pct
            );
            println!("  {} {} ms", "Avg latency:  ".bold(), stats.avg_latency_ms);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// fraudlens health
// ---------------------------------------------------------------------------

/// Check system health: config files, API settings and reachability,
/// dataset, turn log.
pub fn run_health() -> Result<()> {
    println!("{}", "fraudlens Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.fraudlens/config.toml found"
        } else {
            "not found (run `fraudlens config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".fraudlens.toml found"
        } else {
            "none (optional)"
        },
    );

    let key_set = !cfg.api.api_key.is_empty();
    print_health_item(
        "API key",
        key_set,
        if key_set {
            "set"
        } else {
            "missing (set FRAUDLENS_API_KEY)"
        },
    );

    let assistant_set = !cfg.api.assistant_id.is_empty();
    print_health_item(
        "Assistant id",
        assistant_set,
        if assistant_set {
            cfg.api.assistant_id.as_str()
        } else {
            "missing (set api.assistant_id)"
        },
    );

    if cfg.api.is_complete() {
        let client = AssistantClient::from_config(&cfg.api);
        let api_ok = client.is_healthy();
        let detail = if api_ok {
            format!("reachable at {}", cfg.api.base_url)
        } else {
            format!("not reachable at {}", cfg.api.base_url)
        };
        print_health_item("Assistant API", api_ok, &detail);
    }

    match dataset::load_dir(Path::new(&cfg.data.dir)) {
        Ok(dataset) => print_health_item(
            "Dataset",
            true,
            &format!(
                "{} ({} rows, {} columns)",
                dataset.source.display(),
                dataset.row_count(),
                dataset.column_count()
            ),
        ),
        Err(e) => print_health_item("Dataset", false, &e.to_string()),
    }

    let log_exists = logger::turn_log_path().map(|p| p.exists()).unwrap_or(false);
    let log_entries = if log_exists {
        logger::read_all_entries().len()
    } else {
        0
    };
    print_health_item(
        "Turn log",
        log_exists,
        &if log_exists {
            format!("{log_entries} entries")
        } else {
            "no log file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// fraudlens config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective fraudlens Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.fraudlens/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.fraudlens/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".fraudlens.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".fraudlens.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "FRAUDLENS_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.fraudlens/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
