//! # Hashnet Core
//!
//! Greedy upgrade selection for a fleet of hashnet servers.
//!
//! Each tick the selector prices every possible next purchase (a new node,
//! or a Level/RAM/Cores step on an existing node), ranks them by hashes/second
//! gained per unit of cost, and buys the best one if the wallet allows.
//!
//! ## Contents
//! - [`model`]: node stats, caps, targets and candidates
//! - [`host`]: the [`HashnetHost`] boundary (queries, purchases, time)
//! - [`ratio`]: new-node and per-node upgrade ratios
//! - [`selection`]: the candidate fold and cache fallback
//! - [`selector`]: the polling loop
//! - [`status`]: tick reports, published state, formatting
//! - [`testing`]: deterministic in-memory host

pub mod host;
pub mod model;
pub mod ratio;
pub mod selection;
pub mod selector;
pub mod status;
pub mod testing;

pub use host::{HashnetHost, HostError, total_production};
pub use model::{Candidate, NodeLimits, NodeStats, Target, UpgradeKind};
pub use ratio::{catch_up_cost, is_better_purchase, new_node_ratio, upgrade_ratio};
pub use selection::{CACHE_FALLBACK_RATIO, Selection, fleet_fully_upgraded, select_target};
pub use selector::{RunOutcome, SelectorConfig, TickOutcome, UpgradeSelector};
pub use status::{SelectorState, TickReport};
