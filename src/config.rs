use anyhow::{bail, Result};
use std::collections::HashMap;
use std::env;
use std::path::Path;

pub const DEFAULT_CATALOG_PATH: &str = "./restaurant_data.json";
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    // JSON catalog of restaurants and their opening hours
    pub catalog_path: String,

    // How often --watch re-checks the catalog, aligned to the wall clock
    pub watch_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env if present, ignore if missing
        Self::from_getter(|key| env::var(key).ok())
    }

    /// Parse config from a custom getter function (for testing)
    pub fn from_getter<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            catalog_path: get("CATALOG_PATH")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()),

            watch_interval_secs: get("WATCH_INTERVAL_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_WATCH_INTERVAL_SECS),
        })
    }

    /// Create config from a HashMap (convenience for testing)
    pub fn from_map(map: &HashMap<&str, &str>) -> Result<Self> {
        Self::from_getter(|key| map.get(key).map(|v| v.to_string()))
    }

    /// Validate configuration values at startup.
    /// Returns Ok(()) if all validations pass, or Err with details of what failed.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if !Path::new(&self.catalog_path).is_file() {
            errors.push(format!(
                "Catalog file not found at '{}'. Set CATALOG_PATH or pass --catalog.",
                self.catalog_path
            ));
        }

        if self.watch_interval_secs == 0 {
            errors.push("WATCH_INTERVAL_SECS must be greater than 0.".to_string());
        } else if self.watch_interval_secs > 3600 {
            errors.push(format!(
                "WATCH_INTERVAL_SECS={} seems too long (max: 3600).",
                self.watch_interval_secs
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn interval_parsing_never_panics(value in ".*") {
            let mut env: HashMap<&str, String> = HashMap::new();
            env.insert("WATCH_INTERVAL_SECS", value);
            let result = Config::from_getter(|key| env.get(key).cloned());
            prop_assert!(result.is_ok());
        }

        #[test]
        fn valid_interval_round_trips(secs in 1u64..=3600) {
            let mut env: HashMap<&str, String> = HashMap::new();
            env.insert("WATCH_INTERVAL_SECS", secs.to_string());
            let config = Config::from_getter(|key| env.get(key).cloned()).unwrap();
            prop_assert_eq!(config.watch_interval_secs, secs);
        }
    }
}
