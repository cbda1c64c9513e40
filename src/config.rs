use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "ORGANIZEPLUS_DB";
pub(crate) const CURRENCY_ENV: &str = "ORGANIZEPLUS_CURRENCY";
pub(crate) const LOG_ENV: &str = "ORGANIZEPLUS_LOG";

const DEFAULT_CURRENCY: &str = "R$";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) currency: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var(DB_ENV).ok(),
            std::env::var(CURRENCY_ENV).ok(),
        )
    }

    fn resolve(db_override: Option<String>, currency: Option<String>) -> Result<Self> {
        let db_path = match db_override.filter(|p| !p.trim().is_empty()) {
            Some(p) => PathBuf::from(crate::run::shellexpand(p.trim())),
            None => default_db_path()?,
        };
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let currency = currency
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(Self { db_path, currency })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "joffer", "OrganizePlus")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join("organizeplus.db"))
}
