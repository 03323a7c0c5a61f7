//! Hashes/second-per-cost ratios.
//!
//! The ratio is the only metric the selector compares:
//! `(production gained) / (price paid)`.

use crate::host::{HashnetHost, HostError};
use crate::model::{NodeStats, UpgradeKind};

/// Production gained per unit of cost, zero when the price is unusable.
#[inline]
pub fn marginal_ratio(before: f64, after: f64, cost: f64) -> f64 {
    if !cost.is_finite() || cost <= 0.0 {
        return 0.0;
    }
    ((after - before) / cost).max(0.0)
}

/// Hashes/second of `node` according to the host's formula (no RAM in use).
pub fn node_rate<H: HashnetHost + ?Sized>(host: &H, node: &NodeStats) -> f64 {
    host.hash_gain_rate(node.level, 0.0, node.ram, node.cores)
}

/// Price of raising a fresh node from baseline to `reference`'s level, RAM and cores.
///
/// Only axes strictly above their baseline of 1 contribute a term.
pub fn catch_up_cost<H: HashnetHost + ?Sized>(host: &H, reference: &NodeStats) -> f64 {
    let mut cost = 0.0;
    if reference.level > 1 {
        cost += host.level_upgrade_cost(1, reference.level - 1);
    }
    if reference.ram > 1 {
        // RAM doubles per upgrade: 1 -> ram takes log2(ram) steps
        cost += host.ram_upgrade_cost(1, reference.ram.ilog2());
    }
    if reference.cores > 1 {
        cost += host.core_upgrade_cost(1, reference.cores - 1);
    }
    cost
}

/// Ratio of buying a new node and upgrading it to match the newest node.
///
/// The newest node (highest index) is taken as the least upgraded one. That
/// is an approximation: nothing forces later purchases to trail earlier ones.
/// With no nodes the reference is a baseline node.
pub fn new_node_ratio<H: HashnetHost + ?Sized>(host: &H) -> Result<f64, HostError> {
    let reference = match host.node_count() {
        0 => NodeStats::baseline(),
        n => host.node_stats(n - 1)?,
    };

    let income = node_rate(host, &reference);
    let cost = host.purchase_node_cost() + catch_up_cost(host, &reference);

    Ok(marginal_ratio(0.0, income, cost))
}

/// Ratio of a single-step upgrade of `kind` on node `index`.
///
/// Zero when the axis is capped. Cache has no production effect and is
/// always zero; the selector treats it as a fallback instead.
pub fn upgrade_ratio<H: HashnetHost + ?Sized>(
    host: &H,
    index: usize,
    kind: UpgradeKind,
) -> Result<f64, HostError> {
    let node = host.node_stats(index)?;
    if kind == UpgradeKind::Cache || host.limits().is_maxed(&node, kind) {
        return Ok(0.0);
    }

    let before = node_rate(host, &node);
    let after = node_rate(host, &node.upgraded(kind));
    let cost = host.upgrade_cost(index, kind);

    Ok(marginal_ratio(before, after, cost))
}

/// Whether upgrading `kind` on node `index` strictly beats `previous_ratio`.
///
/// Capped axes are never better.
pub fn is_better_purchase<H: HashnetHost + ?Sized>(
    host: &H,
    index: usize,
    kind: UpgradeKind,
    previous_ratio: f64,
) -> Result<bool, HostError> {
    let node = host.node_stats(index)?;
    if host.limits().is_maxed(&node, kind) {
        return Ok(false);
    }
    Ok(upgrade_ratio(host, index, kind)? > previous_ratio)
}
