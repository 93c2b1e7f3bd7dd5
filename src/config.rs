//! Process configuration read from the environment
//!
//! Every value has a default except the collaborator credentials and the delivery
//! destination. Values are read through a lookup function so tests can supply a map instead
//! of mutating the process environment.

use secrecy::SecretString;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_WATCHLIST: &[&str] = &["AAPL", "MSFT", "GOOGL", "NVDA", "TSLA"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(String),

    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}

/// Deployment environment name (`APP_ENV`), `sandbox` when unset
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// How reports reach the delivery collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One message with every symbol's outcome after the whole watch-list ran
    Batch,
    /// One message per report as soon as it is composed, failures summarised at the end
    PerSymbol,
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(DeliveryMode::Batch),
            "per_symbol" | "per-symbol" => Ok(DeliveryMode::PerSymbol),
            other => Err(format!("expected `batch` or `per_symbol`, got `{}`", other)),
        }
    }
}

/// Pacing, retry and timeout policy of one orchestrator run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub lookback_days: u32,
    pub symbol_delay: Duration,
    pub fetch_max_attempts: usize,
    pub fetch_backoff: Duration,
    pub fetch_timeout: Duration,
    pub narration_timeout: Duration,
    pub delivery_timeout: Duration,
    pub delivery_mode: DeliveryMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 120,
            symbol_delay: Duration::from_millis(1000),
            fetch_max_attempts: 3,
            fetch_backoff: Duration::from_millis(2000),
            fetch_timeout: Duration::from_secs(15),
            narration_timeout: Duration::from_secs(30),
            delivery_timeout: Duration::from_secs(15),
            delivery_mode: DeliveryMode::Batch,
        }
    }
}

#[derive(Debug)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub feed: String,
    pub api_key_id: SecretString,
    pub api_secret_key: SecretString,
}

#[derive(Debug)]
pub struct NarrationConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    pub vision_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug)]
pub struct DeliveryConfig {
    pub base_url: String,
    pub bot_token: SecretString,
    pub chat_id: String,
}

#[derive(Debug)]
pub struct Config {
    pub watchlist: Vec<String>,
    pub pipeline: PipelineConfig,
    pub market_data: MarketDataConfig,
    pub narration: NarrationConfig,
    pub delivery: DeliveryConfig,
    pub chart_url_template: Option<String>,
    pub schedule: Option<String>,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns the raw value of a variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup: &lookup };
        let defaults = PipelineConfig::default();

        let watchlist = match vars.optional("WATCHLIST") {
            Some(raw) => parse_watchlist(&raw),
            None => DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
        };
        if watchlist.is_empty() {
            return Err(ConfigError::Invalid {
                name: "WATCHLIST".to_string(),
                value: vars.optional("WATCHLIST").unwrap_or_default(),
                reason: "no symbols".to_string(),
            });
        }

        let fetch_max_attempts: usize =
            vars.parse_or("FETCH_MAX_ATTEMPTS", defaults.fetch_max_attempts)?;
        if fetch_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "FETCH_MAX_ATTEMPTS".to_string(),
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }

        let pipeline = PipelineConfig {
            lookback_days: vars.parse_or("LOOKBACK_DAYS", defaults.lookback_days)?,
            symbol_delay: vars.millis_or("SYMBOL_DELAY_MS", defaults.symbol_delay)?,
            fetch_max_attempts,
            fetch_backoff: vars.millis_or("FETCH_BACKOFF_MS", defaults.fetch_backoff)?,
            fetch_timeout: vars.secs_or("FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            narration_timeout: vars
                .secs_or("NARRATION_TIMEOUT_SECS", defaults.narration_timeout)?,
            delivery_timeout: vars.secs_or("DELIVERY_TIMEOUT_SECS", defaults.delivery_timeout)?,
            delivery_mode: vars.parse_or("DELIVERY_MODE", defaults.delivery_mode)?,
        };

        let market_data = MarketDataConfig {
            base_url: vars.string_or("ALPACA_DATA_URL", "https://data.alpaca.markets"),
            feed: vars.string_or("ALPACA_FEED", "iex"),
            api_key_id: vars.secret("ALPACA_API_KEY_ID")?,
            api_secret_key: vars.secret("ALPACA_API_SECRET_KEY")?,
        };

        let narration = NarrationConfig {
            base_url: vars.string_or("GROQ_API_URL", "https://api.groq.com/openai/v1"),
            api_key: vars.secret("GROQ_API_KEY")?,
            model: vars.string_or("NARRATION_MODEL", "llama-3.3-70b-versatile"),
            vision_model: vars.string_or("NARRATION_VISION_MODEL", "llama-3.2-90b-vision-preview"),
            temperature: vars.parse_or("NARRATION_TEMPERATURE", 0.3)?,
            max_tokens: vars.parse_or("NARRATION_MAX_TOKENS", 200)?,
        };

        let delivery = DeliveryConfig {
            base_url: vars.string_or("TELEGRAM_API_URL", "https://api.telegram.org"),
            bot_token: vars.secret("TELEGRAM_TOKEN")?,
            chat_id: vars.required("TELEGRAM_CHAT_ID")?,
        };

        Ok(Self {
            watchlist,
            pipeline,
            market_data,
            narration,
            delivery,
            chart_url_template: vars.optional("CHART_URL_TEMPLATE"),
            schedule: vars.optional("REPORT_SCHEDULE"),
        })
    }
}

/// Split a comma separated watch-list, upper-casing symbols and dropping blanks and repeats
/// while keeping first-seen order.
pub fn parse_watchlist(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_ascii_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

struct Vars<'a, F> {
    lookup: &'a F,
}

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Set and non-blank
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    fn secret(&self, name: &str) -> Result<SecretString, ConfigError> {
        Ok(SecretString::new(self.required(name)?.into()))
    }

    fn string_or(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name: name.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn millis_or(&self, name: &str, default: Duration) -> Result<Duration, ConfigError> {
        let millis = self.parse_or(name, default.as_millis() as u64)?;
        Ok(Duration::from_millis(millis))
    }

    fn secs_or(&self, name: &str, default: Duration) -> Result<Duration, ConfigError> {
        let secs = self.parse_or(name, default.as_secs())?;
        Ok(Duration::from_secs(secs))
    }
}
