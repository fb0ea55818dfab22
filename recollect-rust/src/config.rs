use crate::{unlock, RecollectError, RecollectResult};
use std::{collections::HashMap, env, path::PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` leaves the app running with enrichment disabled.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
    pub port: u16,
    /// Allowed CORS origin.
    pub app_url: String,
    /// `None` keeps cards in memory only.
    pub storage_dir: Option<PathBuf>,
    pub unlock_code: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: None,
            port: DEFAULT_PORT,
            app_url: DEFAULT_APP_URL.to_string(),
            storage_dir: None,
            unlock_code: unlock::DEFAULT_UNLOCK_CODE.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> RecollectResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an explicit set of variables.
    pub fn from_vars(vars: &HashMap<String, String>) -> RecollectResult<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RecollectResult<Self> {
        // Empty values count as unset.
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| RecollectError::Config(format!("invalid PORT: {port}")))?,
            None => defaults.port,
        };

        let unlock_code = var("RECOLLECT_UNLOCK_CODE").unwrap_or(defaults.unlock_code);
        unlock::validate_passcode(&unlock_code)?;

        Ok(Self {
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL"),
            port,
            app_url: var("APP_URL").unwrap_or(defaults.app_url),
            storage_dir: var("RECOLLECT_STORAGE_DIR").map(PathBuf::from),
            unlock_code,
        })
    }
}
