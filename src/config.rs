use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "FINANCE_ALERTS_DATA_DIR";
/// Environment variable for the currency symbol used in alert messages.
pub const ENV_CURRENCY: &str = "FINANCE_ALERTS_CURRENCY";
/// Environment variable selecting `compact` or `json` log output.
pub const ENV_LOG_FORMAT: &str = "FINANCE_ALERTS_LOG_FORMAT";

const APP_DIR_NAME: &str = "finance-alerts";
const DEFAULT_DB_FILE: &str = "alerts.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Parse from the env value. Unknown values fall back to compact.
    pub fn from_setting(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Host-side configuration. Detector thresholds are deliberately absent:
/// they live in `engine::thresholds` as constants.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub currency_symbol: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_file_name: DEFAULT_DB_FILE.into(),
            currency_symbol: "$".into(),
            log_format: LogFormat::Compact,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and then read the process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup so tests don't touch process env.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(symbol) = lookup(ENV_CURRENCY).filter(|s| !s.trim().is_empty()) {
            config.currency_symbol = symbol;
        }
        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            match LogFormat::from_setting(&raw) {
                Some(format) => config.log_format = format,
                // Logging isn't up yet, so this goes to stderr.
                None => eprintln!("Unknown {ENV_LOG_FORMAT}={raw:?}, using compact"),
            }
        }

        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".finance-alerts"))
}
