//! Upgrade Selector loop tests against the scripted in-memory host.
//!
//! Covers:
//! - No funds: nothing bought, status still reported, long sleep
//! - Completed fleet: immediate termination, no purchase
//! - Run window: loop stops once the host clock passes the deadline
//! - First-node acquisition waits for funds
//! - Refused purchases are retried on the next tick
//! - Full run: nodes, then upgrades, then caches, then completion
//! - Upgrades adding no production are still bought so the fleet completes

use std::time::Duration;

use hashnet_core::selector::{BUSY_INTERVAL, IDLE_INTERVAL};
use hashnet_core::testing::FakeHost;
use hashnet_core::{
    HashnetHost, NodeStats, RunOutcome, SelectorConfig, SelectorState, Target, TickOutcome,
    UpgradeKind, UpgradeSelector,
};

fn unbounded() -> SelectorConfig {
    SelectorConfig::new(None)
}

// =============================================================================
// Single ticks
// =============================================================================

#[tokio::test]
async fn test_no_funds_reports_without_buying() {
    let mut host = FakeHost::new();
    host.add_node(NodeStats::baseline());

    let mut selector = UpgradeSelector::new(host, unbounded());
    let outcome = selector.step().await.unwrap();

    let TickOutcome::Continue(report) = outcome else {
        panic!("fleet is not complete");
    };
    assert!(!report.attempted);
    assert!(!report.purchased);
    assert!(report.price.is_finite());
    assert!(report.production > 0.0);
    assert_eq!(report.remaining, None);

    let host = selector.into_host();
    assert!(host.purchases.is_empty());
    assert_eq!(host.sleeps, vec![IDLE_INTERVAL]);
}

#[tokio::test]
async fn test_successful_purchase_sleeps_short() {
    let mut host = FakeHost::new().with_funds(1_000_000.0);
    host.add_node(NodeStats::baseline());

    let mut selector = UpgradeSelector::new(host, unbounded());
    let TickOutcome::Continue(report) = selector.step().await.unwrap() else {
        panic!("fleet is not complete");
    };
    assert!(report.purchased);
    assert_eq!(report.eta, None);
    assert_eq!(selector.state().purchases, 1);
    assert_eq!(selector.host().sleeps, vec![BUSY_INTERVAL]);
}

#[tokio::test]
async fn test_refused_purchase_retried_next_tick() {
    let mut host = FakeHost::new().with_funds(1_000_000.0);
    host.add_node(NodeStats::baseline());
    host.refuse_next = 1;

    let mut selector = UpgradeSelector::new(host, unbounded());

    let TickOutcome::Continue(first) = selector.step().await.unwrap() else {
        panic!("fleet is not complete");
    };
    assert!(first.attempted);
    assert!(!first.purchased);

    let TickOutcome::Continue(second) = selector.step().await.unwrap() else {
        panic!("fleet is not complete");
    };
    assert!(second.purchased);
    assert_eq!(second.target, first.target);

    assert_eq!(selector.state().failed_purchases, 1);
    assert_eq!(selector.state().purchases, 1);
    assert_eq!(selector.host().sleeps, vec![IDLE_INTERVAL, BUSY_INTERVAL]);
}

#[tokio::test]
async fn test_completed_fleet_terminates_without_purchase() {
    let mut host = FakeHost::new().with_funds(1e12);
    for _ in 0..host.limits.max_nodes {
        let node = host.maxed_node();
        host.add_node(node);
    }

    let mut selector = UpgradeSelector::new(host, unbounded());
    let outcome = selector.run().await.unwrap();

    assert_eq!(outcome, RunOutcome::FullyUpgraded);
    assert!(selector.state().is_finished);
    assert_eq!(selector.state().ticks, 0);
    let host = selector.into_host();
    assert!(host.purchases.is_empty());
    assert!(host.sleeps.is_empty());
}

// =============================================================================
// Run window
// =============================================================================

#[tokio::test]
async fn test_deadline_stops_loop() {
    let mut host = FakeHost::new();
    host.add_node(NodeStats::baseline());

    let config = SelectorConfig::new(Some(Duration::from_secs(3)));
    let mut selector = UpgradeSelector::new(host, config);
    assert_eq!(selector.remaining(), Some(Duration::from_secs(3)));

    let outcome = selector.run().await.unwrap();

    assert_eq!(outcome, RunOutcome::DeadlineReached);
    assert_eq!(selector.state().ticks, 3);
    assert_eq!(selector.remaining(), Some(Duration::ZERO));
}

#[tokio::test]
async fn test_deadline_during_first_node_wait() {
    let host = FakeHost::new();
    let config = SelectorConfig::new(Some(Duration::from_secs(2)));
    let mut selector = UpgradeSelector::new(host, config);

    let outcome = selector.run().await.unwrap();

    assert_eq!(outcome, RunOutcome::DeadlineReached);
    assert_eq!(selector.state().ticks, 0);
    assert_eq!(selector.host().node_count(), 0);
}

#[tokio::test]
async fn test_window_past_end_of_clock_is_unbounded() {
    let mut host = FakeHost::new();
    host.sleep(Duration::from_secs(1)).await;

    let selector = UpgradeSelector::new(host, SelectorConfig::new(Some(Duration::MAX)));
    assert_eq!(selector.remaining(), None);
}

// =============================================================================
// First node
// =============================================================================

#[tokio::test]
async fn test_first_node_waits_for_funds() {
    let mut host = FakeHost::new();
    host.income_per_sec = 500.0;

    let mut selector = UpgradeSelector::new(host, unbounded());
    assert!(selector.acquire_first_node().await.unwrap());

    let host = selector.into_host();
    assert_eq!(host.nodes.len(), 1);
    assert_eq!(host.purchases, vec![Target::NewNode]);
    // 0 -> 500 -> 1000, then buy
    assert_eq!(host.sleeps, vec![IDLE_INTERVAL, IDLE_INTERVAL]);
    assert_eq!(host.funds, 0.0);
}

#[tokio::test]
async fn test_first_node_retried_after_refusal() {
    let mut host = FakeHost::new().with_funds(5_000.0);
    host.refuse_next = 1;

    let mut selector = UpgradeSelector::new(host, unbounded());
    assert!(selector.acquire_first_node().await.unwrap());

    let host = selector.into_host();
    assert_eq!(host.nodes.len(), 1);
    assert_eq!(host.sleeps, vec![IDLE_INTERVAL]);
}

// =============================================================================
// Full run
// =============================================================================

fn run_to_completion() -> FakeHost {
    let mut host = FakeHost::new();
    host.income_per_sec = 10_000.0;
    host
}

#[tokio::test]
async fn test_full_run_reaches_completion() {
    let mut selector = UpgradeSelector::new(run_to_completion(), unbounded());
    let outcome = selector.run().await.unwrap();
    assert_eq!(outcome, RunOutcome::FullyUpgraded);

    let host = selector.into_host();
    let limits = host.limits;
    assert_eq!(host.nodes.len(), limits.max_nodes);
    assert!(host.nodes.iter().all(|n| limits.is_fully_upgraded(n)));

    // 4 nodes; per node: 2 levels, 2 RAM doublings, 1 core, 1 cache
    assert_eq!(host.purchases.len(), 4 + 4 * 6);

    // Caches are only bought once nothing else is left, in node order
    let tail: Vec<_> = host.purchases[host.purchases.len() - 4..].to_vec();
    let expected: Vec<_> = (0..4)
        .map(|index| Target::Upgrade {
            kind: UpgradeKind::Cache,
            index,
        })
        .collect();
    assert_eq!(tail, expected);
    assert!(
        host.purchases[..host.purchases.len() - 4]
            .iter()
            .all(|t| !matches!(t, Target::Upgrade { kind: UpgradeKind::Cache, .. }))
    );
}

#[tokio::test]
async fn test_zero_gain_axis_still_completes() {
    let mut host = FakeHost::new().with_funds(1e12);
    host.core_weight = 0.0;
    let mut node = host.maxed_node();
    node.cores = 1;
    for _ in 0..host.limits.max_nodes {
        host.add_node(node);
    }

    let config = SelectorConfig::new(Some(Duration::from_secs(3600)));
    let mut selector = UpgradeSelector::new(host, config);
    let outcome = selector.run().await.unwrap();
    assert_eq!(outcome, RunOutcome::FullyUpgraded);

    let host = selector.into_host();
    let expected: Vec<_> = (0..4)
        .map(|index| Target::Upgrade {
            kind: UpgradeKind::Cores,
            index,
        })
        .collect();
    assert_eq!(host.purchases, expected);
    assert!(host.nodes.iter().all(|n| n.cores == 2));
}

#[tokio::test]
async fn test_full_run_is_reproducible() {
    let mut a = UpgradeSelector::new(run_to_completion(), unbounded());
    let mut b = UpgradeSelector::new(run_to_completion(), unbounded());
    a.run().await.unwrap();
    b.run().await.unwrap();

    assert_eq!(a.host().purchases, b.host().purchases);
    assert_eq!(a.state().ticks, b.state().ticks);
}

#[tokio::test]
async fn test_state_channel_receives_final_state() {
    let (tx, rx) = tokio::sync::watch::channel(SelectorState::default());
    let config = unbounded().with_state_channel(tx);

    let mut selector = UpgradeSelector::new(run_to_completion(), config);
    selector.run().await.unwrap();

    let state = rx.borrow().clone();
    assert!(state.is_finished);
    assert_eq!(state.purchases, selector.state().purchases);
    assert!(state.last_report.is_some());
}
