use crate::prelude::*;

use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::time::Duration;

#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Serial device, raw HID node or `TEST`.
    #[serde(default)]
    pub device: Option<String>,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "Config::default_serial_timeout")]
    pub serial_timeout: Duration,

    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "Config::default_usb_timeout")]
    pub usb_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: None,
            loglevel: Self::default_loglevel(),
            serial_timeout: Self::default_serial_timeout(),
            usb_timeout: Self::default_usb_timeout(),
        }
    }
}

impl Config {
    pub fn new(file: &str) -> Result<Self> {
        let content = std::fs::read_to_string(file)
            .map_err(|err| anyhow!("error reading {}: {}", file, err))?;

        Self::from_yaml(&content).map_err(|err| anyhow!("error parsing {}: {}", file, err))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // an empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(content)?)
    }

    pub fn loglevel(&self) -> &str {
        &self.loglevel
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }

    fn default_serial_timeout() -> Duration {
        Duration::from_secs(2)
    }

    fn default_usb_timeout() -> Duration {
        Duration::from_secs(5)
    }
}
