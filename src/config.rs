//! Environment-driven configuration.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `ISS_TRACKER_DATASET` | path to the OEM dataset (JSON) | required |
//! | `ISS_TRACKER_ADDR` | socket address to bind | `0.0.0.0:3000` |
//! | `ISS_TRACKER_REFRESH_SECS` | dataset reload interval, seconds | no reload |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub dataset: PathBuf,
    pub refresh: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ISS_TRACKER_DATASET is not set")]
    MissingDataset,
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`], but with an injected variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let dataset = get("ISS_TRACKER_DATASET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingDataset)?
            .into();

        let raw_addr = get("ISS_TRACKER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        let addr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "ISS_TRACKER_ADDR",
            value: raw_addr,
        })?;

        let refresh = match get("ISS_TRACKER_REFRESH_SECS") {
            None => None,
            Some(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                ConfigError::Invalid { name: "ISS_TRACKER_REFRESH_SECS", value: raw }
            })?)),
        };

        Ok(Self { addr, dataset, refresh })
    }
}
