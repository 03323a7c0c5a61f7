//! Candidate selection.
//!
//! One tick's decision is a pure fold over an explicit candidate list:
//! the new-node option first, then Level/RAM/Cores for every node in index
//! order. The highest ratio wins. On equal ratios a purchasable candidate
//! beats one without a finite price, otherwise the earlier candidate stays.
//!
//! Cache carries no production ratio. It is chosen only as a fallback when
//! the winning candidate has no finite price, i.e. nothing else can be bought.

use crate::host::{HashnetHost, HostError};
use crate::model::{Candidate, Target, UpgradeKind};
use crate::ratio::{new_node_ratio, upgrade_ratio};

/// Ratio assigned to a fallback cache upgrade so it outranks everything.
pub const CACHE_FALLBACK_RATIO: f64 = f64::MAX;

/// Result of evaluating one tick's options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub candidate: Candidate,
    /// Number of candidates compared by the fold.
    pub considered: usize,
    /// Whether the cache fallback replaced the fold's winner.
    pub cache_fallback: bool,
}

/// The "buy a new node" option, priced with its catch-up cost.
pub fn new_node_candidate<H: HashnetHost + ?Sized>(host: &H) -> Result<Candidate, HostError> {
    Ok(Candidate {
        target: Target::NewNode,
        cost: host.purchase_node_cost(),
        ratio: new_node_ratio(host)?,
    })
}

/// Level/RAM/Cores options of every node that are still below their caps.
pub fn upgrade_candidates<H: HashnetHost + ?Sized>(host: &H) -> Result<Vec<Candidate>, HostError> {
    let limits = host.limits();
    let mut candidates = Vec::with_capacity(host.node_count() * UpgradeKind::RATED.len());

    for index in 0..host.node_count() {
        let node = host.node_stats(index)?;
        for kind in UpgradeKind::RATED {
            if limits.is_maxed(&node, kind) {
                continue;
            }
            candidates.push(Candidate {
                target: Target::Upgrade { kind, index },
                cost: host.upgrade_cost(index, kind),
                ratio: upgrade_ratio(host, index, kind)?,
            });
        }
    }

    Ok(candidates)
}

/// Highest-ratio candidate; the first one wins ties between equally
/// purchasable candidates.
pub fn pick_best(candidates: &[Candidate]) -> Option<Candidate> {
    candidates.iter().copied().fold(None, |best, candidate| match best {
        Some(current) if !outranks(&candidate, &current) => Some(current),
        _ => Some(candidate),
    })
}

/// Strictly higher ratio, or an equal ratio with a finite price against an
/// infinite one (a zero-gain upgrade beats the unpriced new node at the cap).
fn outranks(candidate: &Candidate, current: &Candidate) -> bool {
    candidate.ratio > current.ratio
        || (candidate.ratio == current.ratio
            && candidate.is_purchasable()
            && !current.is_purchasable())
}

/// Cache upgrade on the first node whose cache is below its cap.
pub fn cache_fallback<H: HashnetHost + ?Sized>(host: &H) -> Result<Option<Candidate>, HostError> {
    let limits = host.limits();
    for index in 0..host.node_count() {
        let node = host.node_stats(index)?;
        if limits.is_maxed(&node, UpgradeKind::Cache) {
            continue;
        }
        return Ok(Some(Candidate {
            target: Target::Upgrade {
                kind: UpgradeKind::Cache,
                index,
            },
            cost: host.upgrade_cost(index, UpgradeKind::Cache),
            ratio: CACHE_FALLBACK_RATIO,
        }));
    }
    Ok(None)
}

/// Choose this tick's purchase target.
///
/// Deterministic: identical host state always yields the same target.
pub fn select_target<H: HashnetHost + ?Sized>(host: &H) -> Result<Selection, HostError> {
    let seed = new_node_candidate(host)?;
    let mut candidates = vec![seed];
    candidates.extend(upgrade_candidates(host)?);

    let best = pick_best(&candidates).unwrap_or(seed);
    if best.is_purchasable() {
        return Ok(Selection {
            candidate: best,
            considered: candidates.len(),
            cache_fallback: false,
        });
    }

    match cache_fallback(host)? {
        Some(cache) => Ok(Selection {
            candidate: cache,
            considered: candidates.len(),
            cache_fallback: true,
        }),
        None => Ok(Selection {
            candidate: best,
            considered: candidates.len(),
            cache_fallback: false,
        }),
    }
}

/// Whether the fleet is at the node cap with every node fully upgraded.
pub fn fleet_fully_upgraded<H: HashnetHost + ?Sized>(host: &H) -> Result<bool, HostError> {
    let limits = host.limits();
    let count = host.node_count();
    if count != limits.max_nodes {
        return Ok(false);
    }
    for index in 0..count {
        if !limits.is_fully_upgraded(&host.node_stats(index)?) {
            return Ok(false);
        }
    }
    Ok(true)
}
