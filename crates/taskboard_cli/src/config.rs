//! Runtime configuration for the CLI.
//!
//! # Responsibility
//! - Resolve database and log locations from flags, environment and
//!   platform data directories.
//!
//! # Invariants
//! - Resolved log directories are absolute, as `init_logging` requires.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "taskboard";
const DB_FILE_NAME: &str = "taskboard.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Fills unset locations with `<data dir>/taskboard/...`.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self> {
        let app_dir = match (&db_path, &log_dir) {
            (Some(_), Some(_)) => None,
            _ => Some(default_app_dir()?),
        };
        let app_dir = app_dir.as_deref();

        let db_path = db_path.unwrap_or_else(|| join_default(app_dir, DB_FILE_NAME));
        let log_dir = absolutize(log_dir.unwrap_or_else(|| join_default(app_dir, LOG_DIR_NAME)))?;
        let log_level =
            log_level.unwrap_or_else(|| taskboard_core::default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

fn default_app_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| anyhow!("no platform data directory; pass --db and --log-dir"))
}

fn join_default(app_dir: Option<&Path>, name: &str) -> PathBuf {
    app_dir.map(|dir| dir.join(name)).unwrap_or_else(|| PathBuf::from(name))
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use std::path::PathBuf;

    #[test]
    fn explicit_locations_are_kept() {
        let config = AppConfig::resolve(
            Some(PathBuf::from("/tmp/board.sqlite3")),
            Some(PathBuf::from("/tmp/board-logs")),
            Some("warn".to_string()),
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/board.sqlite3"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/board-logs"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn relative_log_dir_is_made_absolute() {
        let config = AppConfig::resolve(
            Some(PathBuf::from("board.sqlite3")),
            Some(PathBuf::from("logs")),
            None,
        )
        .unwrap();
        assert!(config.log_dir.is_absolute());
        assert_eq!(config.log_level, taskboard_core::default_log_level());
    }
}
