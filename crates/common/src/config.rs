use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_SYMBOLS: &[&str] = &[
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT", "ADAUSDT", "AVAXUSDT", "DOGEUSDT",
    "DOTUSDT", "LINKUSDT",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where the symbol universe comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Universe {
    Static(Vec<String>),
    /// Top movers reported by the brokerage. `fallback` is used when that lookup fails.
    TopMovers { limit: usize, fallback: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrokerConfig {
    pub api_key: String,
    pub secret_key: String,
    pub base_url: String,
    pub quote_asset: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub rsi_window: usize,
    pub min_training_rows: usize,
    pub n_trees: usize,
    pub seed: u64,
}

/// Static configuration, read once at startup and passed by reference afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub quantity: u32,
    pub universe: Universe,
    pub bar_interval: String,
    pub bar_count: usize,
    pub model: ModelConfig,
    pub broker: BrokerConfig,
    pub telegram: Option<TelegramConfig>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            min_training_rows: 10,
            n_trees: 100,
            seed: 42,
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            base_url: "https://api.binance.com".to_string(),
            quote_asset: "USDT".to_string(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            quantity: 1,
            universe: Universe::Static(default_symbols()),
            bar_interval: "1d".to_string(),
            bar_count: 100,
            model: ModelConfig::default(),
            broker: BrokerConfig::default(),
            telegram: None,
        }
    }
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let symbols = match lookup("SYMBOLS") {
            Some(raw) => parse_symbols(&raw),
            None => default_symbols(),
        };
        if symbols.is_empty() {
            return Err(ConfigError::Invalid {
                key: "SYMBOLS",
                value: lookup("SYMBOLS").unwrap_or_default(),
                reason: "no symbols listed".to_string(),
            });
        }

        let universe = match lookup("UNIVERSE_SOURCE").as_deref() {
            None | Some("static") => Universe::Static(symbols),
            Some("top_movers") => Universe::TopMovers {
                limit: parse_or(&lookup, "TOP_MOVERS_LIMIT", 10)?,
                fallback: symbols,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "UNIVERSE_SOURCE",
                    value: other.to_string(),
                    reason: "expected `static` or `top_movers`".to_string(),
                });
            }
        };

        let model = ModelConfig {
            rsi_window: positive(&lookup, "RSI_WINDOW", defaults.model.rsi_window)?,
            min_training_rows: positive(
                &lookup,
                "MIN_TRAINING_ROWS",
                defaults.model.min_training_rows,
            )?,
            n_trees: positive(&lookup, "FOREST_TREES", defaults.model.n_trees)?,
            seed: parse_or(&lookup, "FOREST_SEED", defaults.model.seed)?,
        };

        let broker = BrokerConfig {
            api_key: lookup("BINANCE_API_KEY").ok_or(ConfigError::Missing("BINANCE_API_KEY"))?,
            secret_key: lookup("BINANCE_SECRET_KEY")
                .ok_or(ConfigError::Missing("BINANCE_SECRET_KEY"))?,
            base_url: lookup("BINANCE_BASE_URL").unwrap_or(defaults.broker.base_url),
            quote_asset: lookup("QUOTE_ASSET").unwrap_or(defaults.broker.quote_asset),
        };

        let telegram = match (lookup("TELEGRAM_BOT_TOKEN"), lookup("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig {
                token,
                chat_id: parse_value("TELEGRAM_CHAT_ID", &chat_id)?,
            }),
            _ => None,
        };

        Ok(Self {
            quantity: positive(&lookup, "BUY_QUANTITY", defaults.quantity as usize)? as u32,
            universe,
            bar_interval: lookup("BAR_INTERVAL").unwrap_or(defaults.bar_interval),
            bar_count: positive(&lookup, "BAR_COUNT", defaults.bar_count)?,
            model,
            broker,
            telegram,
        })
    }
}

fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn positive<F>(lookup: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: usize = parse_or(lookup, key, default)?;
    if value == 0 || value > u32::MAX as usize {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(value)
}
