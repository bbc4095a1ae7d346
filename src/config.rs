//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;

/// Bounds for the `days_per_week` selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub min: u32,
    pub max: u32,
}

impl DayBounds {
    /// Build bounds, rejecting an empty or zero-based range.
    pub fn new(min: u32, max: u32) -> Result<Self, ConfigError> {
        if min == 0 || min > max {
            return Err(ConfigError::Invalid {
                name: "ANIMA_MIN_DAYS/ANIMA_MAX_DAYS",
                message: format!("invalid day range {}..={}", min, max),
            });
        }
        Ok(Self { min, max })
    }

    /// Clamp a raw day count into the range.
    pub fn clamp(&self, days: i64) -> u32 {
        days.clamp(i64::from(self.min), i64::from(self.max)) as u32
    }
}

impl Default for DayBounds {
    fn default() -> Self {
        Self { min: 2, max: 6 }
    }
}

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Anima API (no trailing slash)
    pub api_url: String,
    /// File holding the durable session slot
    pub session_path: PathBuf,
    /// Allowed range for days per week
    pub day_bounds: DayBounds,
    /// Treat HTTP 403 like 401 (ends the session)
    pub forbidden_is_unauthorized: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            session_path: env::temp_dir().join("anima-test-session.json"),
            day_bounds: DayBounds::default(),
            forbidden_is_unauthorized: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("ANIMA_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "ANIMA_API_URL",
                message: format!("expected an http(s) URL, got {:?}", api_url),
            });
        }

        let session_path = match env::var("ANIMA_SESSION_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_path()?,
        };

        let min = parse_var("ANIMA_MIN_DAYS", DayBounds::default().min)?;
        let max = parse_var("ANIMA_MAX_DAYS", DayBounds::default().max)?;

        Ok(Self {
            api_url,
            session_path,
            day_bounds: DayBounds::new(min, max)?,
            forbidden_is_unauthorized: parse_var("ANIMA_FORBIDDEN_IS_UNAUTHORIZED", true)?,
        })
    }
}

fn default_session_path() -> Result<PathBuf, ConfigError> {
    let home = env::var("HOME").map_err(|_| ConfigError::Missing("HOME"))?;
    Ok(PathBuf::from(home).join(".anima").join("session.json"))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_clamp() {
        let bounds = DayBounds::default();
        assert_eq!(bounds.clamp(10), 6);
        assert_eq!(bounds.clamp(-3), 2);
        assert_eq!(bounds.clamp(4), 4);
    }

    #[test]
    fn test_day_bounds_rejects_inverted_range() {
        assert!(DayBounds::new(5, 3).is_err());
        assert!(DayBounds::new(0, 3).is_err());
        assert!(DayBounds::new(3, 3).is_ok());
    }

    #[test]
    fn test_config_from_env() {
        // Set env vars for test
        env::set_var("ANIMA_API_URL", "http://127.0.0.1:9090/");
        env::set_var("ANIMA_SESSION_PATH", "/tmp/anima-config-test.json");
        env::set_var("ANIMA_MAX_DAYS", "5");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_url, "http://127.0.0.1:9090");
        assert_eq!(
            config.session_path,
            PathBuf::from("/tmp/anima-config-test.json")
        );
        assert_eq!(config.day_bounds, DayBounds { min: 2, max: 5 });
        assert!(config.forbidden_is_unauthorized);

        env::remove_var("ANIMA_API_URL");
        env::remove_var("ANIMA_SESSION_PATH");
        env::remove_var("ANIMA_MAX_DAYS");
    }
}
