//! Additional comprehensive tests for configuration parsing and validation

use super::{ConfigParser, EnvManager, validate_config};
use crate::{
    cli::Cli,
    logging::LogFormat,
    models::Config,
};
use clap::Parser;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

/// Write a .env file into a fresh temporary directory
fn env_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn file_vars(path: &std::path::Path) -> HashMap<String, String> {
    EnvManager::read_env_file(path).unwrap().into_iter().collect()
}

/// Test .env file handling
mod env_file_tests {
    use super::*;

    #[test]
    fn test_read_env_file_pairs() {
        let (_dir, path) = env_file(
            "# comment line\nTARGET_HOST=echo.lan\nTARGET_PORT=7007\n\nCONNECTIONS=32\n",
        );

        let vars = file_vars(&path);
        assert_eq!(vars.get("TARGET_HOST").map(String::as_str), Some("echo.lan"));
        assert_eq!(vars.get("TARGET_PORT").map(String::as_str), Some("7007"));
        assert_eq!(vars.get("CONNECTIONS").map(String::as_str), Some("32"));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn test_env_file_feeds_config() {
        let (_dir, path) = env_file(
            "TARGET_PORT=7007\nPAYLOAD_SIZE=128\nPAYLOAD_BYTE=A\nDURATION_SECONDS=5\nLOG_FORMAT=json\n",
        );
        let vars = file_vars(&path);

        let cli = Cli::parse_from(&["elt"]);
        let config = ConfigParser::new(cli)
            .parse_with(|key| vars.get(key).cloned())
            .unwrap();

        assert_eq!(config.port, 7007);
        assert_eq!(config.payload_size, 128);
        assert_eq!(config.payload_byte, b'A');
        assert_eq!(config.duration_seconds, 5);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.host, crate::defaults::DEFAULT_HOST);
    }

    #[test]
    fn test_precedence_file_then_env_then_cli() {
        let (_dir, path) = env_file("CONNECTIONS=10\nTARGET_PORT=7000\nDURATION_SECONDS=9\n");
        let from_file = file_vars(&path);
        let from_env: HashMap<String, String> =
            [("TARGET_PORT".to_string(), "7100".to_string())].into_iter().collect();

        let cli = Cli::parse_from(&["elt", "-d", "4"]);
        let config = ConfigParser::new(cli)
            .parse_with(|key| from_env.get(key).or_else(|| from_file.get(key)).cloned())
            .unwrap();

        assert_eq!(config.connections, 10);
        assert_eq!(config.port, 7100);
        assert_eq!(config.duration_seconds, 4);
    }

    #[test]
    fn test_check_env_file_reports_bad_entries() {
        let (_dir, path) = env_file("TARGET_PORT=0\nCONNECTIONS=many\nDURATION_SECONDS=10\n");

        let warnings = EnvManager::check_env_file(&path).unwrap().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.starts_with("TARGET_PORT=0")));
        assert!(warnings.iter().any(|w| w.starts_with("CONNECTIONS=many")));
    }

    #[test]
    fn test_malformed_env_file_is_parse_error() {
        let (_dir, path) = env_file("THIS LINE IS NOT AN ASSIGNMENT\n");
        let err = EnvManager::read_env_file(&path).unwrap_err();
        assert_eq!(err.category(), "PARSE");
        assert_eq!(err.exit_code(), 1);
    }
}

/// Test edge cases in configuration values
mod config_edge_cases {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let config = Config {
            connections: crate::defaults::MAX_CONNECTIONS,
            payload_size: crate::defaults::MAX_PAYLOAD_SIZE,
            duration_seconds: crate::defaults::MAX_DURATION_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = Config { connections: 1, payload_size: 1, duration_seconds: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_whitespace_env_values_are_trimmed() {
        let mut config = Config::default();
        config
            .merge_from_vars(|key| match key {
                "TARGET_PORT" => Some(" 9009 ".to_string()),
                "CONNECTIONS" => Some("\t16".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.port, 9009);
        assert_eq!(config.connections, 16);
    }

    #[test]
    fn test_blank_host_env_keeps_default() {
        let mut config = Config::default();
        config.merge_from_vars(|key| (key == "TARGET_HOST").then(|| "   ".to_string())).unwrap();
        assert_eq!(config.host, crate::defaults::DEFAULT_HOST);
    }

    #[test]
    fn test_warnings_accumulate() {
        let config = Config {
            host: "203.0.113.5".to_string(),
            connections: 20_000,
            duration_seconds: 1,
            payload_size: 1 << 20,
            ..Default::default()
        };

        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 4);
    }
}
