//! Client configuration
//!
//! Configuration is loaded from environment variables; every field has a
//! working default for local play.

use std::env;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// WebSocket URL of the game server
    pub server_url: String,
    /// Reconnect configuration
    pub reconnect: ReconnectConfig,
}

/// Reconnect backoff configuration
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnect attempt
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts
    pub max_delay: Duration,
    /// Growth factor applied after each attempt
    pub multiplier: f64,
    /// Attempts before giving up
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:5000/ws".to_string(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(15),
            multiplier: 2.0,
            max_attempts: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("SERVER_URL")
            && !url.is_empty()
        {
            config.server_url = url;
        }

        if let Ok(val) = env::var("RECONNECT_INITIAL_DELAY_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.reconnect.initial_delay = Duration::from_millis(ms);
        }
        if let Ok(val) = env::var("RECONNECT_MAX_DELAY_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.reconnect.max_delay = Duration::from_millis(ms);
        }
        if let Ok(val) = env::var("RECONNECT_MULTIPLIER")
            && let Ok(m) = val.parse::<f64>()
            && m >= 1.0
        {
            config.reconnect.multiplier = m;
        }
        if let Ok(val) = env::var("RECONNECT_MAX_ATTEMPTS")
            && let Ok(n) = val.parse()
        {
            config.reconnect.max_attempts = n;
        }

        config
    }
}
