//! Planner limits.
//!
//! The engine functions take a [`PlannerConfig`] where an input size needs a
//! guard. The binary builds one from the environment (after `.env` has been
//! loaded) and a plan file may override it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

const ENV_MAX_REPLICAS: &str = "IPV4_PLANNER_MAX_REPLICAS";
const ENV_MAX_REQUEST_ROWS: &str = "IPV4_PLANNER_MAX_REQUEST_ROWS";
const ENV_MAX_NETWORKS: &str = "IPV4_PLANNER_MAX_NETWORKS";
const ENV_MIN_LAYER_PREFIX: &str = "IPV4_PLANNER_MIN_LAYER_PREFIX";
const ENV_MAX_LAYERS: &str = "IPV4_PLANNER_MAX_LAYERS";

/// Limits applied to planner input.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum replicas a single VLSM request may ask for.
    pub max_replicas: u32,
    /// Maximum number of VLSM request rows.
    pub max_request_rows: usize,
    /// Maximum number of networks handed to the overlap analyzer.
    pub max_networks: usize,
    /// Shortest supernet prefix accepted by the hierarchy planner.
    pub min_layer_prefix: u8,
    /// Maximum number of hierarchy layers.
    pub max_layers: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            max_replicas: 64,
            max_request_rows: 16,
            max_networks: 1024,
            min_layer_prefix: 8,
            max_layers: 4,
        }
    }
}

impl PlannerConfig {
    /// Build a config from `IPV4_PLANNER_*` environment variables.
    ///
    /// Unset variables keep their default. Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PlannerConfig::default();
        override_from(&lookup, ENV_MAX_REPLICAS, &mut config.max_replicas);
        override_from(&lookup, ENV_MAX_REQUEST_ROWS, &mut config.max_request_rows);
        override_from(&lookup, ENV_MAX_NETWORKS, &mut config.max_networks);
        override_from(&lookup, ENV_MIN_LAYER_PREFIX, &mut config.min_layer_prefix);
        override_from(&lookup, ENV_MAX_LAYERS, &mut config.max_layers);

        if config.min_layer_prefix > 32 {
            log::warn!(
                "{ENV_MIN_LAYER_PREFIX}={} is above 32, using 32",
                config.min_layer_prefix
            );
            config.min_layer_prefix = 32;
        }
        log::debug!("Planner config: {:?}", config);
        config
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => log::warn!("Ignoring {key}='{raw}', not a valid number"),
        }
    }
}
