//! # Simulation Configuration
//!
//! TOML schema for the simulated economy. Every key is optional.
//!
//! ```toml
//! starting_funds = 100000.0
//! time_scale = 60.0
//!
//! [constants]
//! max_servers = 8
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::constants::HashnetConstants;

/// Slowest non-zero pacing accepted from a config file.
pub const MIN_TIME_SCALE: f64 = 1e-3;

/// Root configuration for [`crate::SimulatedHashnet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Wallet balance at start.
    pub starting_funds: f64,
    /// Simulated seconds per wall-clock second. `0` never sleeps for real.
    pub time_scale: f64,
    /// Money credited per hash produced.
    pub cash_per_hash: f64,
    /// Global production multiplier.
    pub production_mult: f64,
    pub constants: HashnetConstants,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_funds: 0.0,
            time_scale: 1.0,
            cash_per_hash: hashnet_core::selector::DEFAULT_CASH_PER_HASH,
            production_mult: 1.0,
            constants: HashnetConstants::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read sim config: {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid sim config: {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            bail!("time_scale must be >= 0, got {}", self.time_scale);
        }
        if self.time_scale > 0.0 && self.time_scale < MIN_TIME_SCALE {
            bail!(
                "time_scale must be 0 or at least {MIN_TIME_SCALE}, got {}",
                self.time_scale
            );
        }
        if !self.starting_funds.is_finite() || self.starting_funds < 0.0 {
            bail!("starting_funds must be >= 0, got {}", self.starting_funds);
        }
        if self.cash_per_hash <= 0.0 || self.production_mult <= 0.0 {
            bail!("cash_per_hash and production_mult must be positive");
        }
        let c = &self.constants;
        if c.max_level == 0 || c.max_cores == 0 || c.max_cache == 0 {
            bail!("attribute caps must be at least 1");
        }
        if !c.max_ram.is_power_of_two() {
            bail!("max_ram must be a power of two, got {}", c.max_ram);
        }
        Ok(())
    }
}
