//! End-to-end: the Upgrade Selector driving the simulated economy.

use std::time::Duration;

use hashnet_core::{HashnetHost, RunOutcome, SelectorConfig, UpgradeSelector};
use hashnet_sim::{HashnetConstants, SimConfig, SimulatedHashnet};

/// Small caps and boosted production so a full run stays short.
fn small_economy() -> SimConfig {
    SimConfig {
        starting_funds: 50_000.0,
        time_scale: 0.0,
        production_mult: 100.0,
        constants: HashnetConstants {
            max_servers: 3,
            max_level: 5,
            max_ram: 4,
            max_cores: 2,
            max_cache: 2,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_sim_run_to_full_upgrade() {
    let sim = SimulatedHashnet::new(small_economy());
    let mut selector = UpgradeSelector::new(sim, SelectorConfig::new(None));

    let outcome = selector.run().await.unwrap();
    assert_eq!(outcome, RunOutcome::FullyUpgraded);

    let sim = selector.into_host();
    let limits = sim.limits();
    assert_eq!(sim.node_count(), limits.max_nodes);
    assert!(sim.nodes().iter().all(|n| limits.is_fully_upgraded(n)));
    assert!(sim.available_funds() >= 0.0);
    // Wallet balances: start + earned - spent
    let expected = 50_000.0 + sim.earned() - sim.spent();
    assert!((sim.available_funds() - expected).abs() < 1e-3 * expected.max(1.0));
}

#[tokio::test]
async fn test_sim_run_respects_deadline() {
    let sim = SimulatedHashnet::new(SimConfig {
        time_scale: 0.0,
        ..Default::default()
    });
    let config = SelectorConfig::new(Some(Duration::from_secs(30)));
    let mut selector = UpgradeSelector::new(sim, config);

    let outcome = selector.run().await.unwrap();
    assert_eq!(outcome, RunOutcome::DeadlineReached);
    assert!(selector.host().elapsed() >= Duration::from_secs(30));
    // No starting funds and no income: the first node never arrives
    assert_eq!(selector.host().node_count(), 0);
}

#[tokio::test]
async fn test_sim_attributes_never_decrease() {
    let sim = SimulatedHashnet::new(small_economy());
    let mut selector = UpgradeSelector::new(sim, SelectorConfig::new(None));
    assert!(selector.acquire_first_node().await.unwrap());

    let mut previous = selector.host().nodes().to_vec();
    for _ in 0..500 {
        selector.step().await.unwrap();
        let current = selector.host().nodes();
        for (before, after) in previous.iter().zip(current) {
            assert!(after.level >= before.level);
            assert!(after.ram >= before.ram);
            assert!(after.cores >= before.cores);
            assert!(after.cache >= before.cache);
        }
        previous = current.to_vec();
    }
}
