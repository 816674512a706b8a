//! Runtime configuration, read from the environment.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `SINGALBUCKS_CHANNEL_BUFFER` | Request queue size of each actor | 32 |
//! | `SINGALBUCKS_COUNTER_RETRIES` | Rejected writes against an unchanged counter before giving up | 25 |
//! | `SINGALBUCKS_MENU` | Path to a JSON menu (see [`Menu::from_json`]) | built-in menu |

use crate::clients::DEFAULT_MAX_RETRIES;
use crate::model::{Menu, MenuError};
use std::path::PathBuf;
use thiserror::Error;

pub const CHANNEL_BUFFER_VAR: &str = "SINGALBUCKS_CHANNEL_BUFFER";
pub const COUNTER_RETRIES_VAR: &str = "SINGALBUCKS_COUNTER_RETRIES";
pub const MENU_VAR: &str = "SINGALBUCKS_MENU";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("Cannot read menu file {}: {source}", .path.display())]
    MenuFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid menu file {}: {source}", .path.display())]
    Menu { path: PathBuf, source: MenuError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub channel_buffer: usize,
    pub counter_max_retries: u32,
    pub menu: Menu,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            counter_max_retries: DEFAULT_MAX_RETRIES,
            menu: Menu::default(),
        }
    }
}

impl SystemConfig {
    /// Reads the `SINGALBUCKS_*` variables. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), with variables resolved by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(CHANNEL_BUFFER_VAR) {
            config.channel_buffer = parse_positive(CHANNEL_BUFFER_VAR, &value)?;
        }
        if let Some(value) = lookup(COUNTER_RETRIES_VAR) {
            config.counter_max_retries = parse_positive(COUNTER_RETRIES_VAR, &value)?;
        }
        if let Some(path) = lookup(MENU_VAR) {
            config.menu = load_menu(PathBuf::from(path))?;
        }
        Ok(config)
    }
}

fn parse_positive<N>(var: &'static str, value: &str) -> Result<N, ConfigError>
where
    N: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<N>() {
        Ok(n) if n > N::default() => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}

fn load_menu(path: PathBuf) -> Result<Menu, ConfigError> {
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(source) => return Err(ConfigError::MenuFile { path, source }),
    };
    Menu::from_json(&json).map_err(|source| ConfigError::Menu { path, source })
}
