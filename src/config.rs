use dotenv::dotenv;
use std::env;
use tracing::debug;

const BOOK_LEVELS: &str = "BOOK_LEVELS";
const RECENT_TRADES: &str = "RECENT_TRADES";
const DEFAULT_USER: &str = "DEFAULT_USER";
const LOG_LEVEL: &str = "LOG_LEVEL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Levels shown per side when none are requested.
    pub book_levels: usize,
    /// Trades shown when no count is requested.
    pub recent_trades: usize,
    /// User attached to interactive orders that name none.
    pub default_user: String,
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Config {
    pub fn try_from_env() -> Result<Config, String> {
        // Load .env file
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; absent keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, String> {
        let defaults = Config::default();

        let book_levels = parse_count(&lookup, BOOK_LEVELS)?.unwrap_or(defaults.book_levels);
        let recent_trades = parse_count(&lookup, RECENT_TRADES)?.unwrap_or(defaults.recent_trades);

        let default_user = lookup(DEFAULT_USER)
            .map(|user| user.trim().to_string())
            .filter(|user| !user.is_empty())
            .unwrap_or(defaults.default_user);

        let log_level = lookup(LOG_LEVEL)
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or(defaults.log_level);

        let config = Config {
            book_levels,
            recent_trades,
            default_user,
            log_level,
        };
        debug!(?config, "configuration loaded");
        Ok(config)
    }
}

fn parse_count(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<usize>, String> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| format!("failed to parse environment variable {}: {}", key, raw))
        })
        .transpose()
}

impl Default for Config {
    fn default() -> Config {
        Config {
            book_levels: 10,
            recent_trades: 20,
            default_user: "user1".to_string(),
            log_level: "info".to_string(),
        }
    }
}
