use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Argb, ColorError, RenderColors};
use crate::theme::ThemeMode;

const APP_DIR: &str = "qrkeep";
const DEFAULT_TICK_RATE_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(
    name = "qrkeep",
    about = "k9s-style terminal UI for generating QR payloads and keeping their history"
)]
pub struct Cli {
    /// History database path
    #[arg(long, env = "QRKEEP_DB")]
    pub db_path: Option<PathBuf>,

    /// Default foreground color for new codes (#RRGGBB or #AARRGGBB)
    #[arg(long, env = "QRKEEP_FOREGROUND")]
    pub foreground: Option<String>,

    /// Default background color for new codes (#RRGGBB or #AARRGGBB)
    #[arg(long, env = "QRKEEP_BACKGROUND")]
    pub background: Option<String>,

    /// Interface theme: dark, light or contrast
    #[arg(long, env = "QRKEEP_THEME")]
    pub theme: Option<String>,

    /// UI tick rate in milliseconds
    #[arg(long)]
    pub tick_rate_ms: Option<u64>,

    /// Log file path
    #[arg(long, env = "QRKEEP_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub db_path: Option<PathBuf>,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub theme: Option<String>,
    pub tick_rate_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {field} color: {source}")]
    InvalidColor {
        field: &'static str,
        source: ColorError,
    },
    #[error("unknown theme: {0}")]
    InvalidTheme(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no data directory found; pass --db-path")]
    NoDataDir,
}

impl ConfigFile {
    pub fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(APP_DIR).join("config.toml"))
    }

    /// Loads the user config file. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Effective settings: CLI/env first, then the config file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub colors: RenderColors,
    pub theme: ThemeMode,
    pub tick_rate: Duration,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(cli: Cli, file: ConfigFile) -> Result<Self, ConfigError> {
        let db_path = match cli.db_path.or(file.db_path) {
            Some(path) => path,
            None => default_db_path().ok_or(ConfigError::NoDataDir)?,
        };

        let defaults = RenderColors::default();
        let colors = RenderColors {
            foreground: parse_color(
                "foreground",
                cli.foreground.or(file.foreground),
                defaults.foreground,
            )?,
            background: parse_color(
                "background",
                cli.background.or(file.background),
                defaults.background,
            )?,
        };

        let theme = match cli.theme.or(file.theme) {
            Some(name) => ThemeMode::parse(&name).ok_or(ConfigError::InvalidTheme(name))?,
            None => ThemeMode::default(),
        };

        let tick_rate_ms = cli
            .tick_rate_ms
            .or(file.tick_rate_ms)
            .unwrap_or(DEFAULT_TICK_RATE_MS)
            .max(1);

        Ok(Self {
            db_path,
            colors,
            theme,
            tick_rate: Duration::from_millis(tick_rate_ms),
            log_file: cli.log_file.or(file.log_file),
        })
    }
}

fn parse_color(
    field: &'static str,
    value: Option<String>,
    default: Argb,
) -> Result<Argb, ConfigError> {
    match value {
        Some(value) => {
            Argb::parse_hex(&value).map_err(|source| ConfigError::InvalidColor { field, source })
        }
        None => Ok(default),
    }
}

pub fn default_db_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join(APP_DIR).join("history.db"))
}
