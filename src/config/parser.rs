//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    models::Config,
    error::Result,
    config::env::EnvManager,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // .env values land in the process environment without overriding it
        EnvManager::load_env_file(self.cli.debug)?;

        self.parse_with(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an explicit variable source
    pub fn parse_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.merge_from_vars(lookup)?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref host) = self.cli.host {
            config.host = host.clone();
        }

        if let Some(port) = self.cli.port {
            config.port = port;
        }

        if let Some(connections) = self.cli.connections {
            config.connections = connections;
        }

        if let Some(payload_size) = self.cli.payload_size {
            config.payload_size = payload_size;
        }

        if let Some(payload_byte) = self.cli.payload_byte {
            config.payload_byte = payload_byte;
        }

        if let Some(duration) = self.cli.duration {
            config.duration_seconds = duration;
        }

        if let Some(enable_color) = self.cli.color_override() {
            config.enable_color = enable_color;
        }

        if let Some(log_format) = self.cli.log_format {
            config.log_format = log_format;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Target: {}", config.target()));
    summary.push(format!("Connections: {}", config.connections));
    summary.push(format!("Payload: {} bytes of '{}'", config.payload_size, config.payload_byte as char));
    summary.push(format!("Duration: {}s", config.duration_seconds));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Log Format: {}", config.log_format));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use clap::Parser;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_config_parser_defaults() {
        let cli = Cli::parse_from(&["elt"]);
        let config = ConfigParser::new(cli).parse_with(no_env).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.connections, crate::defaults::DEFAULT_CONNECTIONS);
        assert_eq!(config.duration(), crate::defaults::DEFAULT_DURATION);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(&[
            "elt", "--host", "::1", "-p", "9001", "-c", "8", "-s", "16",
            "--payload-byte", "q", "-d", "2", "--no-color", "--log-format", "compact", "--verbose",
        ]);
        let config = ConfigParser::new(cli).parse_with(no_env).unwrap();

        assert_eq!(config.host, "::1");
        assert_eq!(config.port, 9001);
        assert_eq!(config.connections, 8);
        assert_eq!(config.payload_size, 16);
        assert_eq!(config.payload_byte, b'q');
        assert_eq!(config.duration_seconds, 2);
        assert!(!config.enable_color);
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let env: HashMap<&str, &str> = [("CONNECTIONS", "8"), ("TARGET_PORT", "7000"), ("ENABLE_COLOR", "false")]
            .into_iter()
            .collect();

        let cli = Cli::parse_from(&["elt", "--connections", "12", "--color"]);
        let config = ConfigParser::new(cli)
            .parse_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.connections, 12);
        assert_eq!(config.port, 7000);
        assert!(config.enable_color);
    }

    #[test]
    fn test_invalid_final_config_rejected() {
        let cli = Cli::parse_from(&["elt", "--connections", "0"]);
        let err = ConfigParser::new(cli).parse_with(no_env).unwrap_err();
        assert_eq!(err.category(), "VALIDATION");
        assert_eq!(err.exit_code(), 1);

        let cli = Cli::parse_from(&["elt", "--host", ""]);
        assert!(ConfigParser::new(cli).parse_with(no_env).is_err());
    }

    #[test]
    fn test_bad_env_value_rejected() {
        let cli = Cli::parse_from(&["elt"]);
        let result = ConfigParser::new(cli)
            .parse_with(|key| (key == "DURATION_SECONDS").then(|| "soon".to_string()));
        let err = result.unwrap_err();
        assert_eq!(err.category(), "PARSE");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("DURATION_SECONDS"));
    }

    #[test]
    fn test_config_summary() {
        let config = Config::default();
        let summary = display_config_summary(&config);

        assert!(summary.contains("Target: 127.0.0.1:8080"));
        assert!(summary.contains("Connections: 500"));
        assert!(summary.contains("Payload: 1024 bytes of 'x'"));
        assert!(summary.contains("Duration: 30s"));
    }
}
