use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

use crate::validation::file::DEFAULT_MAX_FILE_SIZE;

pub struct Config {
    pub port: u16,
    pub analyzer_url: String,
    pub analyzer_key: Option<String>,
    pub analyzer_timeout: Duration,
    pub max_file_size: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let default_max_file_size = DEFAULT_MAX_FILE_SIZE.to_string();

        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            analyzer_url: try_load("ANALYZER_URL", "http://localhost:8000")?,
            analyzer_key: read_secret("ANALYZER_KEY"),
            analyzer_timeout: Duration::from_secs(try_load("ANALYZER_TIMEOUT_SECS", "30")?),
            max_file_size: try_load("MAX_FILE_SIZE", &default_max_file_size)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            analyzer_url: "http://localhost:8000".to_string(),
            analyzer_key: None,
            analyzer_timeout: Duration::from_secs(30),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value {value:?}: {e}"))
}

/// Docker secret first, then the plain environment variable.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Some(secret.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {secret_name} from file: {e}");
            env::var(secret_name).ok().filter(|s| !s.is_empty())
        }
    }
}
