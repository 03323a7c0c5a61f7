//! Fleet model: node stats, caps, and purchase targets.

use serde::{Deserialize, Serialize};

// =============================================================================
// NODE STATS
// =============================================================================

/// Snapshot of a single node as reported by the host.
///
/// Level, RAM, cores and cache never decrease over a node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub level: u32,
    /// RAM in GB, always a power of two.
    pub ram: u32,
    pub cores: u32,
    pub cache: u32,
    /// Current production in hashes/second (host-derived).
    pub production: f64,
}

impl NodeStats {
    /// A freshly purchased node: every attribute at its baseline of 1.
    pub const fn baseline() -> Self {
        Self {
            level: 1,
            ram: 1,
            cores: 1,
            cache: 1,
            production: 0.0,
        }
    }

    /// Current value of an upgrade axis.
    pub fn attribute(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Level => self.level,
            UpgradeKind::Ram => self.ram,
            UpgradeKind::Cores => self.cores,
            UpgradeKind::Cache => self.cache,
        }
    }

    /// Stats after a single-step upgrade of `kind`.
    ///
    /// RAM doubles; every other axis increments by one. Production is left
    /// untouched since only the host can derive it.
    pub fn upgraded(&self, kind: UpgradeKind) -> Self {
        let mut next = *self;
        match kind {
            UpgradeKind::Level => next.level = next.level.saturating_add(1),
            UpgradeKind::Ram => next.ram = next.ram.saturating_mul(2),
            UpgradeKind::Cores => next.cores = next.cores.saturating_add(1),
            UpgradeKind::Cache => next.cache = next.cache.saturating_add(1),
        }
        next
    }
}

// =============================================================================
// LIMITS
// =============================================================================

/// Per-attribute caps plus the global node count cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLimits {
    pub max_nodes: usize,
    pub max_level: u32,
    pub max_ram: u32,
    pub max_cores: u32,
    pub max_cache: u32,
}

impl NodeLimits {
    pub fn cap(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Level => self.max_level,
            UpgradeKind::Ram => self.max_ram,
            UpgradeKind::Cores => self.max_cores,
            UpgradeKind::Cache => self.max_cache,
        }
    }

    /// Whether `kind` can no longer be upgraded on `node`.
    pub fn is_maxed(&self, node: &NodeStats, kind: UpgradeKind) -> bool {
        node.attribute(kind) >= self.cap(kind)
    }

    /// Whether every axis of `node` sits at its cap.
    pub fn is_fully_upgraded(&self, node: &NodeStats) -> bool {
        UpgradeKind::ALL
            .iter()
            .all(|&kind| self.is_maxed(node, kind))
    }
}

// =============================================================================
// TARGETS
// =============================================================================

/// Upgrade axis of an existing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Level,
    Ram,
    Cores,
    Cache,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Level,
        UpgradeKind::Ram,
        UpgradeKind::Cores,
        UpgradeKind::Cache,
    ];

    /// Axes with a meaningful production ratio, in evaluation order.
    pub const RATED: [UpgradeKind; 3] = [UpgradeKind::Level, UpgradeKind::Ram, UpgradeKind::Cores];
}

impl std::fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpgradeKind::Level => write!(f, "Level"),
            UpgradeKind::Ram => write!(f, "RAM"),
            UpgradeKind::Cores => write!(f, "Cores"),
            UpgradeKind::Cache => write!(f, "Cache"),
        }
    }
}

/// What the selector intends to buy next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    NewNode,
    Upgrade { kind: UpgradeKind, index: usize },
}

impl Target {
    /// Node index the target applies to (`None` for a new node).
    pub fn node_index(&self) -> Option<usize> {
        match self {
            Target::NewNode => None,
            Target::Upgrade { index, .. } => Some(*index),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::NewNode => write!(f, "New Node"),
            Target::Upgrade { kind, .. } => write!(f, "{kind}"),
        }
    }
}

/// A priced purchase option with its hashes/second-per-cost ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub target: Target,
    /// Price of the purchase; `f64::INFINITY` when it is unavailable.
    pub cost: f64,
    pub ratio: f64,
}

impl Candidate {
    pub fn is_purchasable(&self) -> bool {
        self.cost.is_finite()
    }

    pub fn is_affordable(&self, funds: f64) -> bool {
        self.is_purchasable() && funds >= self.cost
    }
}
