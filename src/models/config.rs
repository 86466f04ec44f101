//! Configuration data model and validation

use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variables recognised by [`Config::merge_from_env`]
pub const ENV_VARS: &[&str] = &[
    "TARGET_HOST",
    "TARGET_PORT",
    "CONNECTIONS",
    "PAYLOAD_SIZE",
    "PAYLOAD_BYTE",
    "DURATION_SECONDS",
    "ENABLE_COLOR",
    "LOG_FORMAT",
];

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Echo server host name or IP address
    #[serde(default = "default_host")]
    pub host: String,

    /// Echo server TCP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of concurrent connections, one worker each
    #[serde(default = "default_connections")]
    pub connections: u32,

    /// Size in bytes of every request payload
    #[serde(default = "default_payload_size")]
    pub payload_size: usize,

    /// Byte value the payload is filled with
    #[serde(default = "default_payload_byte")]
    pub payload_byte: u8,

    /// Test duration in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connections: default_connections(),
            payload_size: default_payload_size(),
            payload_byte: default_payload_byte(),
            duration_seconds: default_duration_secs(),
            enable_color: default_enable_color(),
            log_format: LogFormat::default(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the test duration as Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_seconds)
    }

    /// `host:port` as typed by the user, before resolution
    pub fn target(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // bare IPv6 literal
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Validate the configuration and return the first hard error
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::validation("Target host cannot be empty"));
        }

        if self.port == 0 {
            return Err(AppError::validation("Target port must be greater than 0"));
        }

        if self.connections == 0 {
            return Err(AppError::validation("Connection count must be greater than 0"));
        }

        if self.connections > crate::defaults::MAX_CONNECTIONS {
            return Err(AppError::validation(format!(
                "Connection count cannot exceed {}",
                crate::defaults::MAX_CONNECTIONS
            )));
        }

        if self.payload_size == 0 {
            return Err(AppError::validation("Payload size must be greater than 0"));
        }

        if self.payload_size > crate::defaults::MAX_PAYLOAD_SIZE {
            return Err(AppError::validation(format!(
                "Payload size cannot exceed {} bytes",
                crate::defaults::MAX_PAYLOAD_SIZE
            )));
        }

        if self.duration_seconds == 0 {
            return Err(AppError::validation("Duration must be greater than 0"));
        }

        if self.duration_seconds > crate::defaults::MAX_DURATION_SECS {
            return Err(AppError::validation(format!(
                "Duration cannot exceed {} seconds",
                crate::defaults::MAX_DURATION_SECS
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_vars(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary variable source (the process environment in production)
    pub fn merge_from_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TARGET_HOST") {
            let host = host.trim();
            if !host.is_empty() {
                self.host = host.to_string();
            }
        }

        if let Some(port) = lookup("TARGET_PORT") {
            self.port = port.trim().parse()
                .map_err(|e| AppError::parse(format!("Invalid TARGET_PORT value '{}': {}", port, e)))?;
        }

        if let Some(connections) = lookup("CONNECTIONS") {
            self.connections = connections.trim().parse()
                .map_err(|e| AppError::parse(format!("Invalid CONNECTIONS value '{}': {}", connections, e)))?;
        }

        if let Some(size) = lookup("PAYLOAD_SIZE") {
            self.payload_size = size.trim().parse()
                .map_err(|e| AppError::parse(format!("Invalid PAYLOAD_SIZE value '{}': {}", size, e)))?;
        }

        if let Some(byte) = lookup("PAYLOAD_BYTE") {
            self.payload_byte = parse_payload_byte(&byte)
                .map_err(|e| AppError::parse(format!("Invalid PAYLOAD_BYTE value '{}': {}", byte, e)))?;
        }

        if let Some(duration) = lookup("DURATION_SECONDS") {
            self.duration_seconds = duration.trim().parse()
                .map_err(|e| AppError::parse(format!("Invalid DURATION_SECONDS value '{}': {}", duration, e)))?;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::parse(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Some(format) = lookup("LOG_FORMAT") {
            self.log_format = format.parse()
                .map_err(|e: AppError| AppError::parse(format!("Invalid LOG_FORMAT value '{}': {}", format, e)))?;
        }

        Ok(())
    }
}

/// Parse a payload fill byte given as a single ASCII character
pub fn parse_payload_byte(s: &str) -> std::result::Result<u8, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        (Some(_), None) => Err("payload byte must be an ASCII character".to_string()),
        _ => Err("payload byte must be exactly one character".to_string()),
    }
}

// Default value functions for serde
fn default_host() -> String {
    crate::defaults::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    crate::defaults::DEFAULT_PORT
}

fn default_connections() -> u32 {
    crate::defaults::DEFAULT_CONNECTIONS
}

fn default_payload_size() -> usize {
    crate::defaults::DEFAULT_PAYLOAD_SIZE
}

fn default_payload_byte() -> u8 {
    crate::defaults::DEFAULT_PAYLOAD_BYTE
}

fn default_duration_secs() -> u64 {
    crate::defaults::DEFAULT_DURATION.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.connections, 500);
        assert_eq!(config.payload_size, 1024);
        assert_eq!(config.payload_byte, b'x');
        assert_eq!(config.duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_empty_host_invalid() {
        let config = Config { host: "  ".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_values_invalid() {
        assert!(Config { port: 0, ..Default::default() }.validate().is_err());
        assert!(Config { connections: 0, ..Default::default() }.validate().is_err());
        assert!(Config { payload_size: 0, ..Default::default() }.validate().is_err());
        assert!(Config { duration_seconds: 0, ..Default::default() }.validate().is_err());
    }

    #[test]
    fn test_upper_bounds() {
        let config = Config {
            connections: crate::defaults::MAX_CONNECTIONS + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            payload_size: crate::defaults::MAX_PAYLOAD_SIZE,
            duration_seconds: crate::defaults::MAX_DURATION_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_target_formatting() {
        let config = Config { host: "echo.local".to_string(), port: 7, ..Default::default() };
        assert_eq!(config.target(), "echo.local:7");

        let config = Config { host: "::1".to_string(), port: 7, ..Default::default() };
        assert_eq!(config.target(), "[::1]:7");
    }

    #[test]
    fn test_merge_from_vars() {
        let mut config = Config::default();
        config.merge_from_vars(vars(&[
            ("TARGET_HOST", "10.0.0.5"),
            ("TARGET_PORT", "9000"),
            ("CONNECTIONS", "64"),
            ("PAYLOAD_SIZE", "256"),
            ("PAYLOAD_BYTE", "z"),
            ("DURATION_SECONDS", "5"),
            ("ENABLE_COLOR", "false"),
            ("LOG_FORMAT", "json"),
        ])).unwrap();

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 9000);
        assert_eq!(config.connections, 64);
        assert_eq!(config.payload_size, 256);
        assert_eq!(config.payload_byte, b'z');
        assert_eq!(config.duration_seconds, 5);
        assert!(!config.enable_color);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_merge_from_vars_rejects_garbage() {
        let mut config = Config::default();
        let err = config.merge_from_vars(vars(&[("TARGET_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("TARGET_PORT"));

        let mut config = Config::default();
        assert!(config.merge_from_vars(vars(&[("PAYLOAD_BYTE", "xy")])).is_err());

        let mut config = Config::default();
        assert!(config.merge_from_vars(vars(&[("LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_merge_from_vars_keeps_defaults_when_absent() {
        let mut config = Config::default();
        config.merge_from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_payload_byte() {
        assert_eq!(parse_payload_byte("x"), Ok(b'x'));
        assert_eq!(parse_payload_byte("0"), Ok(b'0'));
        assert!(parse_payload_byte("").is_err());
        assert!(parse_payload_byte("ab").is_err());
        assert!(parse_payload_byte("é").is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let config: Config = serde_json::from_str(r#"{"port": 7007}"#).unwrap();
        assert_eq!(config.port, 7007);
        assert_eq!(config.connections, crate::defaults::DEFAULT_CONNECTIONS);
        assert_eq!(config.log_format, LogFormat::Console);
    }
}
