//! Environment variable handling and .env file management

use crate::{
    error::{AppError, Result},
    models::Config,
};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the current directory if it exists
    ///
    /// Variables already present in the process environment are not
    /// overwritten, which gives the environment precedence over the file.
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific .env file if it exists
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                println!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Read the key/value pairs of a .env file without touching the process environment
    pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
        // from_path would export every pair into the process environment
        #[allow(deprecated)]
        let iter = dotenv::from_path_iter(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        iter.map(|item| {
            item.map_err(|e| AppError::parse(format!("Failed to parse {}: {}", path.display(), e)))
        })
        .collect()
    }

    /// Validate a single environment variable
    ///
    /// Parses the value exactly as configuration loading would and applies
    /// the same range checks. Unknown keys are ignored.
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        if !crate::models::config::ENV_VARS.contains(&key) {
            return Ok(());
        }

        let mut config = Config::default();
        config.merge_from_vars(|k| (k == key).then(|| value.to_string()))?;
        config.validate()
    }

    /// Check a .env file and describe every invalid entry
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let warnings = Self::read_env_file(path)?
            .into_iter()
            .filter_map(|(key, value)| {
                Self::validate_env_var(&key, &value)
                    .err()
                    .map(|e| format!("{}={}: {}", key, value, e))
            })
            .collect();

        Ok(Some(warnings))
    }
}
