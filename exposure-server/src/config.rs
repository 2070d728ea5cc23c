//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// JSON scoring policy; built-in defaults when unset
    pub policy_file: Option<PathBuf>,

    /// Live session cap
    pub max_sessions: usize,

    /// Sessions older than this are dropped by the reaper
    pub session_ttl_secs: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            policy_file: None,
            max_sessions: 1024,
            session_ttl_secs: 900,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            policy_file: env::var("POLICY_FILE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            max_sessions: env::var("MAX_SESSIONS")
                .ok()
                .and_then(|m| m.parse().ok())
                .filter(|m: &usize| *m > 0)
                .unwrap_or(defaults.max_sessions),

            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.session_ttl_secs),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
