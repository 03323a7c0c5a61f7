//! Simulated hashnet economy.
//!
//! Prices and production follow [`crate::formulas`]. Time is virtual:
//! `sleep` credits income for the slept interval and advances the clock,
//! optionally pacing itself against the wall clock via `time_scale`.

use std::time::Duration;

use async_trait::async_trait;
use hashnet_core::{HashnetHost, HostError, NodeLimits, NodeStats, UpgradeKind};
use tracing::debug;

use crate::config::SimConfig;
use crate::formulas;

/// In-process hashnet economy implementing [`HashnetHost`].
#[derive(Debug, Clone)]
pub struct SimulatedHashnet {
    config: SimConfig,
    nodes: Vec<NodeStats>,
    funds: f64,
    elapsed: Duration,
    /// Money earned from production so far.
    earned: f64,
    /// Money spent on nodes and upgrades so far.
    spent: f64,
}

impl SimulatedHashnet {
    pub fn new(config: SimConfig) -> Self {
        Self {
            funds: config.starting_funds,
            config,
            nodes: Vec::new(),
            elapsed: Duration::ZERO,
            earned: 0.0,
            spent: 0.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[NodeStats] {
        &self.nodes
    }

    pub fn earned(&self) -> f64 {
        self.earned
    }

    pub fn spent(&self) -> f64 {
        self.spent
    }

    /// Fleet production in hashes/second.
    pub fn production(&self) -> f64 {
        self.nodes.iter().map(|n| n.production).sum()
    }

    /// Credit income for `dt` and move the clock forward.
    pub fn advance(&mut self, dt: Duration) {
        let income = self.production() * self.config.cash_per_hash * dt.as_secs_f64();
        self.funds += income;
        self.earned += income;
        self.elapsed += dt;
    }

    /// Wall-clock time to wait for `duration` of simulated time.
    ///
    /// `None` when `time_scale` is 0. Saturates at `Duration::MAX`.
    pub fn wall_clock_pause(&self, duration: Duration) -> Option<Duration> {
        let scale = self.config.time_scale;
        if scale <= 0.0 {
            return None;
        }
        Some(Duration::try_from_secs_f64(duration.as_secs_f64() / scale).unwrap_or(Duration::MAX))
    }

    fn rate(&self, node: &NodeStats) -> f64 {
        self.hash_gain_rate(node.level, 0.0, node.ram, node.cores)
    }

    fn charge(&mut self, cost: f64) -> bool {
        if !cost.is_finite() || self.funds < cost {
            return false;
        }
        self.funds -= cost;
        self.spent += cost;
        true
    }
}

#[async_trait]
impl HashnetHost for SimulatedHashnet {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn limits(&self) -> NodeLimits {
        self.config.constants.limits()
    }

    fn node_stats(&self, index: usize) -> Result<NodeStats, HostError> {
        self.nodes.get(index).copied().ok_or(HostError::UnknownNode {
            index,
            count: self.nodes.len(),
        })
    }

    fn purchase_node_cost(&self) -> f64 {
        formulas::node_cost(&self.config.constants, self.nodes.len())
    }

    fn upgrade_cost(&self, index: usize, kind: UpgradeKind) -> f64 {
        let Some(node) = self.nodes.get(index) else {
            return f64::INFINITY;
        };
        let c = &self.config.constants;
        match kind {
            UpgradeKind::Level => formulas::level_upgrade_cost(c, node.level, 1),
            UpgradeKind::Ram => formulas::ram_upgrade_cost(c, node.ram, 1),
            UpgradeKind::Cores => formulas::core_upgrade_cost(c, node.cores, 1),
            UpgradeKind::Cache => formulas::cache_upgrade_cost(c, node.cache, 1),
        }
    }

    fn available_funds(&self) -> f64 {
        self.funds
    }

    fn hash_gain_rate(&self, level: u32, ram_used: f64, ram: u32, cores: u32) -> f64 {
        formulas::hash_gain_rate(
            &self.config.constants,
            level,
            ram_used,
            ram,
            cores,
            self.config.production_mult,
        )
    }

    fn level_upgrade_cost(&self, start_level: u32, extra: u32) -> f64 {
        formulas::level_upgrade_cost(&self.config.constants, start_level, extra)
    }

    fn ram_upgrade_cost(&self, start_ram: u32, extra: u32) -> f64 {
        formulas::ram_upgrade_cost(&self.config.constants, start_ram, extra)
    }

    fn core_upgrade_cost(&self, start_cores: u32, extra: u32) -> f64 {
        formulas::core_upgrade_cost(&self.config.constants, start_cores, extra)
    }

    fn purchase_node(&mut self) -> Option<usize> {
        let cost = self.purchase_node_cost();
        if !self.charge(cost) {
            debug!(cost, funds = self.funds, "[SIM] Node purchase refused");
            return None;
        }
        let mut node = NodeStats::baseline();
        node.production = self.rate(&node);
        self.nodes.push(node);
        Some(self.nodes.len() - 1)
    }

    fn upgrade(&mut self, index: usize, kind: UpgradeKind) -> bool {
        let cost = self.upgrade_cost(index, kind);
        if !self.charge(cost) {
            debug!(index, ?kind, cost, funds = self.funds, "[SIM] Upgrade refused");
            return false;
        }
        let mut node = self.nodes[index].upgraded(kind);
        node.production = self.rate(&node);
        self.nodes[index] = node;
        true
    }

    async fn sleep(&mut self, duration: Duration) {
        if let Some(pause) = self.wall_clock_pause(duration) {
            tokio::time::sleep(pause).await;
        }
        self.advance(duration);
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
