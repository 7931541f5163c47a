//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PETRADAR_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CANDIDATE_LIMIT, DEFAULT_MAX_DAYS, DEFAULT_MAX_DISTANCE_KM, DEFAULT_MAX_RESULTS,
    DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::ranking::RankerConfig;
use crate::scoring::{ScoringConfig, WeightVector};
use crate::tasks::{
    DEFAULT_TASK_RETENTION_SECS, DEFAULT_TASK_SWEEP_INTERVAL_SECS, DEFAULT_TASK_WORKERS,
    TaskRegistryConfig,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PETRADAR_*` overrides on top of defaults, then
/// [`Config::validate`] before handing the per-component projections out.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Minimum overall score for a ranked candidate. Default: `0.6`.
    pub similarity_threshold: f64,

    /// Default component weights, before normalization. Default: `0.6/0.2/0.1/0.1`.
    pub weights: WeightVector,

    /// Radius (km) at which the location score reaches zero. Default: `50`.
    pub max_distance_km: f64,

    /// Day gap at which the time score reaches zero. Default: `30`.
    pub max_days: f64,

    /// Fixed embedding dimension. Unset accepts the source's dimension.
    pub embedding_dim: Option<usize>,

    /// Ranked comparisons kept per search. Default: `5`.
    pub max_results: usize,

    /// Lost-pet candidates loaded per search. Default: `1000`.
    pub candidate_limit: usize,

    /// Concurrent background tasks. Default: `5`.
    pub task_workers: usize,

    /// How long finished tasks stay queryable. Default: one hour.
    pub task_retention: Duration,

    /// Task reaper interval. Default: one minute.
    pub task_sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            weights: WeightVector::default(),
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            max_days: DEFAULT_MAX_DAYS,
            embedding_dim: None,
            max_results: DEFAULT_MAX_RESULTS,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            task_workers: DEFAULT_TASK_WORKERS,
            task_retention: Duration::from_secs(DEFAULT_TASK_RETENTION_SECS),
            task_sweep_interval: Duration::from_secs(DEFAULT_TASK_SWEEP_INTERVAL_SECS),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PETRADAR_PORT";
    const ENV_BIND_ADDR: &'static str = "PETRADAR_BIND_ADDR";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "PETRADAR_SIMILARITY_THRESHOLD";
    const ENV_WEIGHT_VISUAL: &'static str = "PETRADAR_WEIGHT_VISUAL";
    const ENV_WEIGHT_ATTRIBUTE: &'static str = "PETRADAR_WEIGHT_ATTRIBUTE";
    const ENV_WEIGHT_LOCATION: &'static str = "PETRADAR_WEIGHT_LOCATION";
    const ENV_WEIGHT_TIME: &'static str = "PETRADAR_WEIGHT_TIME";
    const ENV_MAX_DISTANCE_KM: &'static str = "PETRADAR_MAX_DISTANCE_KM";
    const ENV_MAX_DAYS: &'static str = "PETRADAR_MAX_DAYS";
    const ENV_EMBEDDING_DIM: &'static str = "PETRADAR_EMBEDDING_DIM";
    const ENV_MAX_RESULTS: &'static str = "PETRADAR_MAX_RESULTS";
    const ENV_CANDIDATE_LIMIT: &'static str = "PETRADAR_CANDIDATE_LIMIT";
    const ENV_TASK_WORKERS: &'static str = "PETRADAR_TASK_WORKERS";
    const ENV_TASK_RETENTION_SECS: &'static str = "PETRADAR_TASK_RETENTION_SECS";
    const ENV_TASK_SWEEP_INTERVAL_SECS: &'static str = "PETRADAR_TASK_SWEEP_INTERVAL_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Values that do not parse are errors; range checks happen in [`Config::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let similarity_threshold =
            Self::parse_from_env(Self::ENV_SIMILARITY_THRESHOLD, defaults.similarity_threshold)?;
        let weights = WeightVector {
            visual: Self::parse_from_env(Self::ENV_WEIGHT_VISUAL, defaults.weights.visual)?,
            attribute: Self::parse_from_env(
                Self::ENV_WEIGHT_ATTRIBUTE,
                defaults.weights.attribute,
            )?,
            location: Self::parse_from_env(Self::ENV_WEIGHT_LOCATION, defaults.weights.location)?,
            time: Self::parse_from_env(Self::ENV_WEIGHT_TIME, defaults.weights.time)?,
        };
        let max_distance_km =
            Self::parse_from_env(Self::ENV_MAX_DISTANCE_KM, defaults.max_distance_km)?;
        let max_days = Self::parse_from_env(Self::ENV_MAX_DAYS, defaults.max_days)?;
        let embedding_dim = Self::parse_optional_from_env(Self::ENV_EMBEDDING_DIM)?;
        let max_results = Self::parse_from_env(Self::ENV_MAX_RESULTS, defaults.max_results)?;
        let candidate_limit =
            Self::parse_from_env(Self::ENV_CANDIDATE_LIMIT, defaults.candidate_limit)?;
        let task_workers = Self::parse_from_env(Self::ENV_TASK_WORKERS, defaults.task_workers)?;
        let task_retention = Self::parse_secs_from_env(
            Self::ENV_TASK_RETENTION_SECS,
            defaults.task_retention,
        )?;
        let task_sweep_interval = Self::parse_secs_from_env(
            Self::ENV_TASK_SWEEP_INTERVAL_SECS,
            defaults.task_sweep_interval,
        )?;

        Ok(Self {
            port,
            bind_addr,
            similarity_threshold,
            weights,
            max_distance_km,
            max_days,
            embedding_dim,
            max_results,
            candidate_limit,
            task_workers,
            task_retention,
            task_sweep_interval,
        })
    }

    /// Checks ranges and cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::invalid(
                Self::ENV_SIMILARITY_THRESHOLD,
                threshold,
                "must be within [0, 1]",
            ));
        }

        let weights = [
            (Self::ENV_WEIGHT_VISUAL, self.weights.visual),
            (Self::ENV_WEIGHT_ATTRIBUTE, self.weights.attribute),
            (Self::ENV_WEIGHT_LOCATION, self.weights.location),
            (Self::ENV_WEIGHT_TIME, self.weights.time),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::invalid(name, weight, "must be a non-negative number"));
            }
        }
        if self.weights.sum() <= 0.0 {
            return Err(ConfigError::invalid(
                Self::ENV_WEIGHT_VISUAL,
                self.weights.visual,
                "at least one weight must be positive",
            ));
        }

        for (name, value) in [
            (Self::ENV_MAX_DISTANCE_KM, self.max_distance_km),
            (Self::ENV_MAX_DAYS, self.max_days),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(name, value, "must be positive"));
            }
        }

        for (name, value) in [
            (Self::ENV_MAX_RESULTS, self.max_results),
            (Self::ENV_CANDIDATE_LIMIT, self.candidate_limit),
            (Self::ENV_TASK_WORKERS, self.task_workers),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(name, value, "must be at least 1"));
            }
        }

        if self.embedding_dim == Some(0) {
            return Err(ConfigError::invalid(
                Self::ENV_EMBEDDING_DIM,
                0,
                "must be at least 1",
            ));
        }

        if self.task_sweep_interval.is_zero() {
            return Err(ConfigError::invalid(
                Self::ENV_TASK_SWEEP_INTERVAL_SECS,
                0,
                "must be at least 1",
            ));
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            default_weights: self.weights,
            max_distance_km: self.max_distance_km,
            max_days: self.max_days,
        }
    }

    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig {
            similarity_threshold: self.similarity_threshold,
            max_results: Some(self.max_results),
            embedding_dim: self.embedding_dim,
        }
    }

    pub fn task_config(&self) -> TaskRegistryConfig {
        TaskRegistryConfig {
            max_workers: self.task_workers,
            retention: self.task_retention,
            sweep_interval: self.task_sweep_interval,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(Self::parse_optional_from_env(var_name)?.unwrap_or(default))
    }

    fn parse_optional_from_env<T>(var_name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        else {
            return Ok(None);
        };

        raw.parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::invalid(var_name, &raw, e.to_string()))
    }

    fn parse_secs_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        Ok(Self::parse_optional_from_env::<u64>(var_name)?
            .map(Duration::from_secs)
            .unwrap_or(default))
    }
}
