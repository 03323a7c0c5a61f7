//! Deterministic in-memory host for tests and examples.
//!
//! Small caps and simple polynomial prices keep scenarios easy to reason
//! about. Time is virtual: `sleep` returns immediately after advancing the
//! clock and crediting `income_per_sec`.

use std::cell::Cell;
use std::time::Duration;

use async_trait::async_trait;

use crate::host::{HashnetHost, HostError};
use crate::model::{NodeLimits, NodeStats, Target, UpgradeKind};

/// Scripted hashnet economy.
#[derive(Debug)]
pub struct FakeHost {
    pub nodes: Vec<NodeStats>,
    pub limits: NodeLimits,
    pub funds: f64,
    /// Funds credited per virtual second slept.
    pub income_per_sec: f64,
    /// Production gained per extra core; `0.0` makes the cores axis flat.
    pub core_weight: f64,
    /// Number of upcoming purchases the host will refuse regardless of funds.
    pub refuse_next: usize,
    /// Successful purchases, in order.
    pub purchases: Vec<Target>,
    /// Every sleep requested by the caller.
    pub sleeps: Vec<Duration>,
    elapsed: Duration,
    stats_queries: Cell<usize>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            limits: NodeLimits {
                max_nodes: 4,
                max_level: 3,
                max_ram: 4,
                max_cores: 2,
                max_cache: 2,
            },
            funds: 0.0,
            income_per_sec: 0.0,
            core_weight: 0.25,
            refuse_next: 0,
            purchases: Vec::new(),
            sleeps: Vec::new(),
            elapsed: Duration::ZERO,
            stats_queries: Cell::new(0),
        }
    }

    pub fn with_funds(mut self, funds: f64) -> Self {
        self.funds = funds;
        self
    }

    pub fn with_limits(mut self, limits: NodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Insert a node directly (no charge). Production is recomputed.
    pub fn add_node(&mut self, mut node: NodeStats) -> usize {
        node.production = self.hash_gain_rate(node.level, 0.0, node.ram, node.cores);
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// A node with every axis at its cap.
    pub fn maxed_node(&self) -> NodeStats {
        NodeStats {
            level: self.limits.max_level,
            ram: self.limits.max_ram,
            cores: self.limits.max_cores,
            cache: self.limits.max_cache,
            production: 0.0,
        }
    }

    /// How many times `node_stats` has been called.
    pub fn stats_queries(&self) -> usize {
        self.stats_queries.get()
    }

    fn step_cost(&self, value: u32, kind: UpgradeKind) -> f64 {
        if value >= self.limits.cap(kind) {
            return f64::INFINITY;
        }
        let value = f64::from(value);
        match kind {
            UpgradeKind::Level => 100.0 * value,
            UpgradeKind::Ram => 150.0 * value,
            UpgradeKind::Cores => 400.0 * value,
            UpgradeKind::Cache => 50.0 * value,
        }
    }

    fn cumulative_cost(&self, start: u32, extra: u32, kind: UpgradeKind) -> f64 {
        let mut value = start;
        let mut total = 0.0;
        for _ in 0..extra {
            total += self.step_cost(value, kind);
            value = match kind {
                UpgradeKind::Ram => value.saturating_mul(2),
                _ => value.saturating_add(1),
            };
        }
        total
    }

    fn charge(&mut self, cost: f64) -> bool {
        if self.refuse_next > 0 {
            self.refuse_next -= 1;
            return false;
        }
        if !cost.is_finite() || self.funds < cost {
            return false;
        }
        self.funds -= cost;
        true
    }
}

#[async_trait]
impl HashnetHost for FakeHost {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn limits(&self) -> NodeLimits {
        self.limits
    }

    fn node_stats(&self, index: usize) -> Result<NodeStats, HostError> {
        self.stats_queries.set(self.stats_queries.get() + 1);
        self.nodes.get(index).copied().ok_or(HostError::UnknownNode {
            index,
            count: self.nodes.len(),
        })
    }

    fn purchase_node_cost(&self) -> f64 {
        let n = self.nodes.len();
        if n >= self.limits.max_nodes {
            return f64::INFINITY;
        }
        1_000.0 * 2f64.powi(n as i32)
    }

    fn upgrade_cost(&self, index: usize, kind: UpgradeKind) -> f64 {
        match self.nodes.get(index) {
            Some(node) => self.step_cost(node.attribute(kind), kind),
            None => f64::INFINITY,
        }
    }

    fn available_funds(&self) -> f64 {
        self.funds
    }

    fn hash_gain_rate(&self, level: u32, ram_used: f64, ram: u32, cores: u32) -> f64 {
        let ram_mult = 1.0 + 0.5 * f64::from(ram.max(1).ilog2());
        let core_mult = 1.0 + self.core_weight * f64::from(cores.saturating_sub(1));
        let free = 1.0 - ram_used / f64::from(ram.max(1));
        f64::from(level) * ram_mult * core_mult * free
    }

    fn level_upgrade_cost(&self, start_level: u32, extra: u32) -> f64 {
        self.cumulative_cost(start_level, extra, UpgradeKind::Level)
    }

    fn ram_upgrade_cost(&self, start_ram: u32, extra: u32) -> f64 {
        self.cumulative_cost(start_ram, extra, UpgradeKind::Ram)
    }

    fn core_upgrade_cost(&self, start_cores: u32, extra: u32) -> f64 {
        self.cumulative_cost(start_cores, extra, UpgradeKind::Cores)
    }

    fn purchase_node(&mut self) -> Option<usize> {
        let cost = self.purchase_node_cost();
        if !self.charge(cost) {
            return None;
        }
        let index = self.add_node(NodeStats::baseline());
        self.purchases.push(Target::NewNode);
        Some(index)
    }

    fn upgrade(&mut self, index: usize, kind: UpgradeKind) -> bool {
        let cost = self.upgrade_cost(index, kind);
        if !self.charge(cost) {
            return false;
        }
        let next = self.nodes[index].upgraded(kind);
        self.nodes[index] = next;
        self.nodes[index].production = self.hash_gain_rate(next.level, 0.0, next.ram, next.cores);
        self.purchases.push(Target::Upgrade { kind, index });
        true
    }

    async fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.elapsed += duration;
        self.funds += self.income_per_sec * duration.as_secs_f64();
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
