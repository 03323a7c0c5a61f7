//! Host boundary.
//!
//! Everything the selector knows about the fleet comes through [`HashnetHost`]:
//! stats, prices, the production formula, the wallet, purchases, and time.
//! A live economy, the bundled simulation and test fakes all implement it.

use std::time::Duration;

use async_trait::async_trait;

use crate::model::{NodeLimits, NodeStats, UpgradeKind};

/// Host contract violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("Unknown node index {index} (fleet has {count} nodes)")]
    UnknownNode { index: usize, count: usize },
}

/// Query, mutation and time surface of a hashnet economy.
///
/// ## Contract
///
/// - Queries never mutate; a query made twice without an intervening
///   mutation or sleep returns the same value
/// - Unavailable purchases (caps reached) are priced at `f64::INFINITY`
/// - `purchase_node`/`upgrade` report failure instead of erroring; the
///   selector retries on a later tick
/// - `sleep` is the only suspension point
#[async_trait]
pub trait HashnetHost: Send {
    // --- Fleet queries ---

    fn node_count(&self) -> usize;

    fn limits(&self) -> NodeLimits;

    fn node_stats(&self, index: usize) -> Result<NodeStats, HostError>;

    fn max_nodes(&self) -> usize {
        self.limits().max_nodes
    }

    // --- Prices ---

    /// Price of the next node.
    fn purchase_node_cost(&self) -> f64;

    /// Price of a single-step upgrade of `kind` on node `index`.
    fn upgrade_cost(&self, index: usize, kind: UpgradeKind) -> f64;

    fn available_funds(&self) -> f64;

    // --- Formulas ---

    /// Hashes/second of a node with the given attributes.
    fn hash_gain_rate(&self, level: u32, ram_used: f64, ram: u32, cores: u32) -> f64;

    /// Cumulative price of `extra` level upgrades starting at `start_level`.
    fn level_upgrade_cost(&self, start_level: u32, extra: u32) -> f64;

    /// Cumulative price of `extra` RAM doublings starting at `start_ram`.
    fn ram_upgrade_cost(&self, start_ram: u32, extra: u32) -> f64;

    /// Cumulative price of `extra` core upgrades starting at `start_cores`.
    fn core_upgrade_cost(&self, start_cores: u32, extra: u32) -> f64;

    // --- Mutations ---

    /// Buy a node. Returns the new node's index, or `None` if the host refused.
    fn purchase_node(&mut self) -> Option<usize>;

    /// Apply a single-step upgrade. Returns whether the host accepted it.
    fn upgrade(&mut self, index: usize, kind: UpgradeKind) -> bool;

    // --- Time ---

    async fn sleep(&mut self, duration: Duration);

    /// Time elapsed since the host started.
    fn elapsed(&self) -> Duration;
}

/// Sum of current production across every node.
pub fn total_production<H: HashnetHost + ?Sized>(host: &H) -> Result<f64, HostError> {
    (0..host.node_count()).try_fold(0.0, |acc, index| {
        host.node_stats(index).map(|node| acc + node.production)
    })
}
