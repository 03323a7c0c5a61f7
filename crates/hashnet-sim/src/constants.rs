use serde::{Deserialize, Serialize};

use hashnet_core::NodeLimits;

/// Economy constants: base prices, growth multipliers and caps.
///
/// Every field has a default so a config file may override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashnetConstants {
    /// Hashes/second contributed by each level before multipliers.
    pub hashes_per_level: f64,

    /// Price of the first node; also scales level upgrades.
    pub base_cost: f64,
    pub ram_base_cost: f64,
    pub core_base_cost: f64,
    pub cache_base_cost: f64,

    /// Growth of node prices per node owned.
    pub purchase_mult: f64,
    pub upgrade_level_mult: f64,
    pub upgrade_ram_mult: f64,
    pub upgrade_core_mult: f64,
    pub upgrade_cache_mult: f64,

    pub max_servers: usize,
    pub max_level: u32,
    pub max_ram: u32,
    pub max_cores: u32,
    pub max_cache: u32,
}

impl Default for HashnetConstants {
    fn default() -> Self {
        Self {
            hashes_per_level: 0.001,
            base_cost: 50e3,
            ram_base_cost: 200e3,
            core_base_cost: 1e6,
            cache_base_cost: 10e6,
            purchase_mult: 3.2,
            upgrade_level_mult: 1.1,
            upgrade_ram_mult: 1.4,
            upgrade_core_mult: 1.55,
            upgrade_cache_mult: 1.85,
            max_servers: 20,
            max_level: 300,
            max_ram: 8192,
            max_cores: 128,
            max_cache: 15,
        }
    }
}

impl HashnetConstants {
    pub fn limits(&self) -> NodeLimits {
        NodeLimits {
            max_nodes: self.max_servers,
            max_level: self.max_level,
            max_ram: self.max_ram,
            max_cores: self.max_cores,
            max_cache: self.max_cache,
        }
    }
}
