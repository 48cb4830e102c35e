use std::env;
use std::path::PathBuf;

use tracing::debug;

pub const DATA_DIR_ENV_VAR: &str = "RECIPE_SCALER_DATA_DIR";
pub const LOG_ENV_VAR: &str = "RECIPE_SCALER_LOG";

const DEFAULT_DATA_DIR: &str = ".recipe_scaler";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where `DirectoryStore` keeps its files.
    pub data_dir: PathBuf,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: PathBuf::from(try_load(&lookup, DATA_DIR_ENV_VAR, DEFAULT_DATA_DIR)),
            log_filter: try_load(&lookup, LOG_ENV_VAR, DEFAULT_LOG_FILTER),
        }
    }
}

fn try_load(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value.trim().to_string(),
        None => {
            debug!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.data_dir, PathBuf::from(".recipe_scaler"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_values_from_environment() {
        let vars: HashMap<&str, &str> = [
            (DATA_DIR_ENV_VAR, "/tmp/recipes"),
            (LOG_ENV_VAR, " recipe_scaler=debug "),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/recipes"));
        assert_eq!(config.log_filter, "recipe_scaler=debug");
    }

    #[test]
    fn test_blank_value_falls_back() {
        let config = Config::from_lookup(|key| (key == DATA_DIR_ENV_VAR).then(|| "  ".to_string()));
        assert_eq!(config.data_dir, PathBuf::from(".recipe_scaler"));
    }
}
