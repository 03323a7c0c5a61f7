//! Upgrade Selector
//!
//! Greedy polling loop over a [`HashnetHost`]:
//! - Acquire a first node (blocking until affordable)
//! - Per tick: completion check, select best target, buy if affordable,
//!   report, sleep
//!
//! ## Termination
//!
//! - Every node maxed with the node count at its cap → `FullyUpgraded`
//! - Run window elapsed → `DeadlineReached`
//!
//! Failed purchases are not errors. They are logged and the next tick simply
//! re-evaluates from fresh host state.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::host::{HashnetHost, total_production};
use crate::model::Target;
use crate::selection::{fleet_fully_upgraded, select_target};
use crate::status::{
    SelectorState, TickReport, estimate_wait, format_number, format_remaining, log_status,
};

/// Sleep after a successful purchase: re-evaluate quickly while money is being spent.
pub const BUSY_INTERVAL: Duration = Duration::from_millis(20);
/// Sleep when nothing was bought: wait for funds to accumulate.
pub const IDLE_INTERVAL: Duration = Duration::from_secs(1);
/// Money earned by selling one hash.
pub const DEFAULT_CASH_PER_HASH: f64 = 250_000.0;

// =============================================================================
// CONFIG
// =============================================================================

/// Selector configuration.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Length of the run window; `None` runs until fully upgraded.
    pub run_for: Option<Duration>,
    pub busy_interval: Duration,
    pub idle_interval: Duration,
    /// Used to report production in money terms.
    pub cash_per_hash: f64,
    /// Optional watch channel sender for state updates.
    pub state_tx: Option<watch::Sender<SelectorState>>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            run_for: None,
            busy_interval: BUSY_INTERVAL,
            idle_interval: IDLE_INTERVAL,
            cash_per_hash: DEFAULT_CASH_PER_HASH,
            state_tx: None,
        }
    }
}

impl SelectorConfig {
    /// Config with a run window. A zero window means unbounded.
    pub fn new(run_for: Option<Duration>) -> Self {
        Self {
            run_for: run_for.filter(|d| !d.is_zero()),
            ..Default::default()
        }
    }

    /// Config from a duration in hours (`0` or `None` = unbounded).
    pub fn from_hours(hours: Option<f64>) -> Result<Self> {
        let run_for = match hours {
            None => None,
            Some(h) if !h.is_finite() || h < 0.0 => bail!("invalid run duration: {h} hours"),
            Some(h) => Some(
                Duration::try_from_secs_f64(h * 3600.0)
                    .with_context(|| format!("run duration out of range: {h} hours"))?,
            ),
        };
        Ok(Self::new(run_for))
    }

    pub fn with_cash_per_hash(mut self, cash_per_hash: f64) -> Self {
        self.cash_per_hash = cash_per_hash;
        self
    }

    pub fn with_intervals(mut self, busy: Duration, idle: Duration) -> Self {
        self.busy_interval = busy;
        self.idle_interval = idle;
        self
    }

    /// Enable state broadcasting via watch channel.
    pub fn with_state_channel(mut self, tx: watch::Sender<SelectorState>) -> Self {
        self.state_tx = Some(tx);
        self
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    FullyUpgraded,
    DeadlineReached,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The fleet is complete; nothing was evaluated or bought.
    Completed,
    Continue(TickReport),
}

// =============================================================================
// SELECTOR
// =============================================================================

pub struct UpgradeSelector<H: HashnetHost> {
    host: H,
    config: SelectorConfig,
    /// Absolute deadline on the host clock.
    deadline: Option<Duration>,
    state: SelectorState,
}

impl<H: HashnetHost> UpgradeSelector<H> {
    /// Create a selector. The run window starts now on the host clock.
    ///
    /// A window reaching past the end of the clock is unbounded.
    pub fn new(host: H, config: SelectorConfig) -> Self {
        let deadline = config
            .run_for
            .and_then(|run_for| host.elapsed().checked_add(run_for));
        Self {
            host,
            config,
            deadline,
            state: SelectorState::default(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    /// Time left in the run window (`None` = unbounded).
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_sub(self.host.elapsed()))
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| self.host.elapsed() >= deadline)
    }

    /// Block until the fleet has at least one node.
    ///
    /// Returns `false` if the run window closed first.
    pub async fn acquire_first_node(&mut self) -> Result<bool> {
        if self.host.max_nodes() == 0 {
            bail!("host allows no nodes");
        }
        if self.host.node_count() > 0 {
            return Ok(true);
        }

        info!(
            cost = %format_number(self.host.purchase_node_cost()),
            "[SELECTOR] Waiting to purchase first node"
        );

        while self.host.node_count() == 0 {
            if self.deadline_passed() {
                return Ok(false);
            }

            let cost = self.host.purchase_node_cost();
            if self.host.available_funds() >= cost {
                match self.host.purchase_node() {
                    Some(index) => {
                        info!(
                            index,
                            cost = %format_number(cost),
                            "[SELECTOR] First node purchased"
                        );
                        continue;
                    }
                    None => warn!(
                        cost = %format_number(cost),
                        "[SELECTOR] First node purchase refused"
                    ),
                }
            }
            self.host.sleep(self.config.idle_interval).await;
        }
        Ok(true)
    }

    /// Run a single tick: evaluate, maybe buy, report, sleep.
    ///
    /// Assumes at least one node exists (see [`Self::acquire_first_node`]),
    /// though an empty fleet only ever considers a new node.
    pub async fn step(&mut self) -> Result<TickOutcome> {
        // 1-2. Completion check (only meaningful at the node cap)
        if fleet_fully_upgraded(&self.host).context("completion check")? {
            return Ok(TickOutcome::Completed);
        }

        // 3-4. Select the best option
        let selection = select_target(&self.host).context("target selection")?;
        let candidate = selection.candidate;
        debug!(
            considered = selection.considered,
            cache_fallback = selection.cache_fallback,
            target = %candidate.target,
            ratio = candidate.ratio,
            cost = candidate.cost,
            "[SELECTOR] Candidate selected"
        );

        // 5. Buy if affordable
        let funds = self.host.available_funds();
        let attempted = candidate.is_affordable(funds);
        let purchased = attempted && self.execute(candidate.target);
        if purchased {
            info!(
                target_item = %candidate.target,
                index = ?candidate.target.node_index(),
                cost = %format_number(candidate.cost),
                "[SELECTOR] Purchased"
            );
        } else if attempted {
            warn!(
                target_item = %candidate.target,
                index = ?candidate.target.node_index(),
                cost = %format_number(candidate.cost),
                funds = %format_number(funds),
                "[SELECTOR] Purchase refused by host, retrying next tick"
            );
        }

        // 6-7. Report
        let production = total_production(&self.host).context("production total")?;
        let money_rate = production * self.config.cash_per_hash;
        let funds_after = self.host.available_funds();
        let report = TickReport {
            tick: self.state.ticks + 1,
            target: candidate.target,
            price: candidate.cost,
            ratio: candidate.ratio,
            funds: funds_after,
            attempted,
            purchased,
            production,
            money_rate,
            remaining: self.remaining(),
            eta: if purchased {
                None
            } else {
                estimate_wait(candidate.cost, funds_after, money_rate)
            },
        };
        log_status(&report);
        self.state.record(&report);
        self.publish();

        // 8. Sleep
        let pause = if purchased {
            self.config.busy_interval
        } else {
            self.config.idle_interval
        };
        debug!(pause_ms = pause.as_millis() as u64, "[SELECTOR] Sleeping");
        self.host.sleep(pause).await;

        Ok(TickOutcome::Continue(report))
    }

    /// Run until the fleet is fully upgraded or the run window closes.
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let limits = self.host.limits();
        info!(
            remaining = %format_remaining(self.remaining()),
            max_nodes = limits.max_nodes,
            max_level = limits.max_level,
            max_ram = limits.max_ram,
            max_cores = limits.max_cores,
            max_cache = limits.max_cache,
            "[SELECTOR] Starting"
        );

        let outcome = self.run_inner().await?;
        match outcome {
            RunOutcome::FullyUpgraded => info!("[SELECTOR] All hashnet servers fully upgraded"),
            RunOutcome::DeadlineReached => info!("[SELECTOR] Run duration finished"),
        }
        self.mark_finished();
        Ok(outcome)
    }

    async fn run_inner(&mut self) -> Result<RunOutcome> {
        if !self.acquire_first_node().await? {
            return Ok(RunOutcome::DeadlineReached);
        }

        while !self.deadline_passed() {
            if let TickOutcome::Completed = self.step().await? {
                return Ok(RunOutcome::FullyUpgraded);
            }
        }
        Ok(RunOutcome::DeadlineReached)
    }

    fn execute(&mut self, target: Target) -> bool {
        match target {
            Target::NewNode => self.host.purchase_node().is_some(),
            Target::Upgrade { kind, index } => self.host.upgrade(index, kind),
        }
    }

    fn publish(&self) {
        if let Some(tx) = &self.config.state_tx {
            let _ = tx.send(self.state.clone());
        }
    }

    /// Mark the run as finished and broadcast final state.
    pub fn mark_finished(&mut self) {
        self.state.is_finished = true;
        self.publish();
    }
}
