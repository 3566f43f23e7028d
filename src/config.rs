use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::Schema;

pub(crate) const DEFAULT_WORKSHEET: &str = "Sheet1";
const DEFAULT_TTL_SECS: u64 = 60;
const MIN_TTL_SECS: u64 = 5;
const MAX_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) worksheet: String,
    pub(crate) schema: Schema,
    pub(crate) cache_ttl: Duration,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if let Some(dir) = config.db_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create data directory: {}", dir.display())
                })?;
            }
        }
        Ok(config)
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match get("TRIPBUDGET_DB") {
            Some(path) => PathBuf::from(path.trim()),
            None => data_dir()?.join("tripbudget.db"),
        };

        let worksheet = get("TRIPBUDGET_WORKSHEET")
            .map(|w| w.trim().to_string())
            .unwrap_or_else(|| DEFAULT_WORKSHEET.to_string());

        let schema = match get("TRIPBUDGET_SCHEMA") {
            Some(s) => Schema::parse(&s)
                .with_context(|| format!("Invalid TRIPBUDGET_SCHEMA '{s}', expected en or id"))?,
            None => Schema::default(),
        };

        let ttl_secs = match get("TRIPBUDGET_CACHE_TTL") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid TRIPBUDGET_CACHE_TTL '{s}'"))?,
            None => DEFAULT_TTL_SECS,
        };
        let cache_ttl = Duration::from_secs(ttl_secs.clamp(MIN_TTL_SECS, MAX_TTL_SECS));

        Ok(Self {
            db_path,
            worksheet,
            schema,
            cache_ttl,
        })
    }
}

pub(crate) fn data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "tripbudget", "TripBudget")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
