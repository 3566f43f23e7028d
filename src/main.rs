mod book;
mod config;
mod export;
mod format;
mod models;
mod run;
mod session;
mod sheet;
mod summary;
mod ui;

use anyhow::{Context, Result};

use book::BudgetBook;
use config::Config;
use sheet::SqliteWorksheet;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env()?;
    let interactive = args.len() == 1;
    init_logging(&config, interactive)?;

    log::debug!(
        "Using store {} (worksheet '{}', schema {}, cache {}s)",
        config.db_path.display(),
        config.worksheet,
        config.schema,
        config.cache_ttl.as_secs()
    );

    let sheet = SqliteWorksheet::new(&config.db_path, &config.worksheet);
    let mut book = BudgetBook::new(Box::new(sheet), config.schema, config.cache_ttl);

    if interactive {
        run::as_tui(&mut book)
    } else {
        run::as_cli(&args, &mut book)
    }
}

/// The TUI owns the terminal, so it logs to a file next to the store.
fn init_logging(config: &Config, interactive: bool) -> Result<()> {
    let mut builder = if interactive {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
    };

    if interactive {
        let log_dir = match config.db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => config::data_dir()?,
        };
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
        let log_path = log_dir.join("tripbudget.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .context("Failed to initialise logging")
}
