use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Missing {0}: set it, mount /run/secrets/{0}, or set DATASTORE_FIXTURES")]
    Missing(&'static str),
}

pub enum DatastoreConfig {
    Hosted { url: String, key: String },
    Fixtures(PathBuf),
}

pub struct Config {
    pub port: u16,
    pub site_url: String,
    pub revalidate_secs: u64,
    pub datastore: DatastoreConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "3000")?,
            site_url: try_load::<String>("SITE_URL", "http://localhost:3000")?
                .trim_end_matches('/')
                .to_string(),
            revalidate_secs: try_load("REVALIDATE_SECS", "3600")?,
            datastore: load_datastore()?,
        })
    }
}

fn load_datastore() -> Result<DatastoreConfig, ConfigError> {
    if let Ok(path) = var("DATASTORE_FIXTURES") {
        info!("Serving fixtures from {path}");
        return Ok(DatastoreConfig::Fixtures(PathBuf::from(path)));
    }

    let url = var("DATASTORE_URL").map_err(|_| ConfigError::Missing("DATASTORE_URL"))?;
    let key = read_secret("DATASTORE_KEY").ok_or(ConfigError::Missing("DATASTORE_KEY"))?;

    Ok(DatastoreConfig::Hosted { url, key })
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found");
    })
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}

/// Docker secret first, then the environment.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .or_else(|_| var(secret_name))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_default_and_invalid() {
        let port: u16 = try_load("WORTH_IT_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);

        let err = try_load::<u16>("WORTH_IT_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert!(err.to_string().starts_with("Invalid WORTH_IT_TEST_UNSET_PORT value"));
    }

    #[test]
    fn test_missing_secret() {
        assert_eq!(read_secret("WORTH_IT_TEST_UNSET_SECRET"), None);
    }
}
