use std::env;
use std::time::Duration;

use crate::error::{invalid_input_error, Error};

/// Tunables the surrounding deployment controls. Rates and intervals are
/// configuration, not invariants of the coordination logic.
#[derive(Clone, Debug)]
pub struct Config {
    /// Fare per kilometre.
    pub unit_rate: f64,
    /// Floor applied to every fare; a zero-distance ride costs this much.
    pub minimum_fare: f64,
    pub report_interval: Duration,
    pub discovery_interval: Duration,
    pub default_radius_km: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit_rate: 5000.0,
            minimum_fare: 1000.0,
            report_interval: Duration::from_secs(5),
            discovery_interval: Duration::from_secs(5),
            default_radius_km: 2.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let defaults = Self::default();

        Ok(Self {
            unit_rate: env_f64("UNIT_RATE", defaults.unit_rate)?,
            minimum_fare: env_f64("MINIMUM_FARE", defaults.minimum_fare)?,
            report_interval: Duration::from_secs(env_u64(
                "REPORT_INTERVAL_SECS",
                defaults.report_interval.as_secs(),
            )?),
            discovery_interval: Duration::from_secs(env_u64(
                "DISCOVERY_INTERVAL_SECS",
                defaults.discovery_interval.as_secs(),
            )?),
            default_radius_km: env_f64("DEFAULT_RADIUS_KM", defaults.default_radius_km)?,
        })
    }
}

fn env_f64(key: &str, default: f64) -> Result<f64, Error> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| invalid_input_error()),
        Err(_) => Ok(default),
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64, Error> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| invalid_input_error()),
        Err(_) => Ok(default),
    }
}
