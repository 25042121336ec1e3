use log::{info, warn};
use std::env;
use std::time::Duration;

use crate::bridge::template::CatalogVersion;
use crate::error::{BridgeError, Result};
use crate::models::UnitSystem;

const DEFAULT_USERNAME: &str = "meteobridge";
const DEFAULT_POLL_SECS: u64 = 60;
const MIN_POLL_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Host name or IP of the Meteobridge, optionally with a port
    pub address: Option<String>,
    pub username: String,
    pub password: Option<String>,
    pub units: UnitSystem,
    pub catalog_version: CatalogVersion,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl BridgeConfig {
    pub fn new() -> Result<Self> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (environment, tests)
    ///
    /// Missing address or password is not an error here: the service keeps
    /// running and reports "not configured" on every poll until they are set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let address = non_empty("METEOBRIDGE_ADDRESS");
        let password = non_empty("METEOBRIDGE_PASSWORD");
        let username =
            non_empty("METEOBRIDGE_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string());

        let units = match non_empty("METEOBRIDGE_UNITS") {
            Some(value) => value
                .parse::<UnitSystem>()
                .map_err(BridgeError::Configuration)?,
            None => UnitSystem::default(),
        };

        let catalog_version = match non_empty("METEOBRIDGE_LIGHTNING") {
            Some(value) => match value.to_lowercase().as_str() {
                "true" | "yes" | "1" => CatalogVersion::WithLightning,
                "false" | "no" | "0" => CatalogVersion::Standard,
                other => {
                    return Err(BridgeError::Configuration(format!(
                        "METEOBRIDGE_LIGHTNING must be true or false, got '{}'",
                        other
                    )))
                }
            },
            None => CatalogVersion::default(),
        };

        let poll_secs = parse_secs(non_empty("METEOBRIDGE_POLL_SECS"), DEFAULT_POLL_SECS)?;
        if poll_secs < MIN_POLL_SECS {
            return Err(BridgeError::Configuration(format!(
                "METEOBRIDGE_POLL_SECS must be at least {}",
                MIN_POLL_SECS
            )));
        }
        let timeout_secs =
            parse_secs(non_empty("METEOBRIDGE_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;

        let config = BridgeConfig {
            address,
            username,
            password,
            units,
            catalog_version,
            poll_interval: Duration::from_secs(poll_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        };

        if config.address.is_none() {
            warn!("IP address or hostname of your Meteobridge device is required (METEOBRIDGE_ADDRESS)");
        }
        if config.password.is_none() {
            warn!("Password for Meteobridge must be set (METEOBRIDGE_PASSWORD)");
        }
        info!(
            "Units: {}, template: {:?}, poll interval: {}s",
            config.units, config.catalog_version, poll_secs
        );

        Ok(config)
    }

    /// Address and password, or the reason the bridge can't be queried yet
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.address.as_deref(), self.password.as_deref()) {
            (Some(address), Some(password)) => Ok((address, password)),
            (None, _) => Err(BridgeError::Configuration(
                "Meteobridge address is not set".into(),
            )),
            (_, None) => Err(BridgeError::Configuration(
                "Meteobridge password is not set".into(),
            )),
        }
    }
}

fn parse_secs(value: Option<String>, default: u64) -> Result<u64> {
    match value {
        Some(value) => value.parse::<u64>().map_err(|e| {
            BridgeError::Configuration(format!("invalid number of seconds '{}': {}", value, e))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<BridgeConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BridgeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.username, "meteobridge");
        assert_eq!(config.units, UnitSystem::Metric);
        assert_eq!(config.catalog_version, CatalogVersion::WithLightning);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert!(config.credentials().unwrap_err().is_configuration());
    }

    #[test]
    fn test_full_configuration() {
        let config = load(&[
            ("METEOBRIDGE_ADDRESS", "192.168.1.40"),
            ("METEOBRIDGE_PASSWORD", "secret"),
            ("METEOBRIDGE_UNITS", "US"),
            ("METEOBRIDGE_LIGHTNING", "false"),
            ("METEOBRIDGE_POLL_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.credentials().unwrap(), ("192.168.1.40", "secret"));
        assert_eq!(config.units, UnitSystem::Us);
        assert_eq!(config.catalog_version, CatalogVersion::Standard);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_password_is_not_configured() {
        let config = load(&[
            ("METEOBRIDGE_ADDRESS", "meteobridge.local"),
            ("METEOBRIDGE_PASSWORD", "  "),
        ])
        .unwrap();
        assert!(matches!(
            config.credentials(),
            Err(BridgeError::Configuration(ref msg)) if msg.contains("password")
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("METEOBRIDGE_UNITS", "kelvin")]).is_err());
        assert!(load(&[("METEOBRIDGE_LIGHTNING", "maybe")]).is_err());
        assert!(load(&[("METEOBRIDGE_POLL_SECS", "1")]).is_err());
        assert!(load(&[("METEOBRIDGE_TIMEOUT_SECS", "ten")]).is_err());
    }
}
