//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use remix_session::application::settings::SessionSettings;

use crate::error::AppError;

/// Configuration for the API server and its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Settings for the hosted session.
    pub session: SessionSettings,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns a variable's
    /// value if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = SessionSettings::default();
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse_or(lookup, "PORT", 3000_u16)?;
        let total_rounds = parse_or(lookup, "REMIX_TOTAL_ROUNDS", defaults.total_rounds)?;
        let time_per_round =
            parse_or(lookup, "REMIX_SECONDS_PER_ROUND", defaults.time_per_round)?;
        let tick_millis: u64 = parse_or(lookup, "REMIX_TICK_MILLIS", 1000)?;

        let session = SessionSettings {
            total_rounds,
            time_per_round,
            tick_period: Duration::from_millis(tick_millis),
        };
        session
            .state_machine()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            host,
            port,
            session,
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(&lookup(&[])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.session, SessionSettings::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        // Arrange
        let vars = lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("REMIX_TOTAL_ROUNDS", "6"),
            ("REMIX_SECONDS_PER_ROUND", "300"),
            ("REMIX_TICK_MILLIS", "250"),
        ]);

        // Act
        let config = AppConfig::from_lookup(&vars).unwrap();

        // Assert
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.session.total_rounds, 6);
        assert_eq!(config.session.time_per_round, 300);
        assert_eq!(config.session.tick_period, Duration::from_millis(250));
    }

    #[test]
    fn test_non_numeric_port_is_a_config_error() {
        let result = AppConfig::from_lookup(&lookup(&[("PORT", "eighty")]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("PORT")));
    }

    #[test]
    fn test_zero_rounds_is_a_config_error() {
        let result = AppConfig::from_lookup(&lookup(&[("REMIX_TOTAL_ROUNDS", "0")]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_tick_period_is_a_config_error() {
        let result = AppConfig::from_lookup(&lookup(&[("REMIX_TICK_MILLIS", "0")]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
