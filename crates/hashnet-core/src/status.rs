//! Status reporting: per-tick report, published state, and text formatting.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::Target;

// =============================================================================
// TICK REPORT
// =============================================================================

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub target: Target,
    /// Price of the target at decision time.
    pub price: f64,
    pub ratio: f64,
    /// Funds after any purchase.
    pub funds: f64,
    /// Whether the target was affordable and a purchase was attempted.
    pub attempted: bool,
    /// Whether the host accepted the purchase.
    pub purchased: bool,
    /// Fleet production in hashes/second.
    pub production: f64,
    /// Monetized production (money/second).
    pub money_rate: f64,
    /// Time left in the run window (`None` = unbounded).
    pub remaining: Option<Duration>,
    /// Estimated wait until the target is affordable.
    pub eta: Option<Duration>,
}

/// Wait until `price` is affordable at `money_rate`, if it is not already.
///
/// `None` when already affordable, unpriced, or nothing is being produced.
pub fn estimate_wait(price: f64, funds: f64, money_rate: f64) -> Option<Duration> {
    if !price.is_finite() || price <= funds || money_rate <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64((price - funds) / money_rate).ok()
}

/// Emit the status line for a tick.
pub fn log_status(report: &TickReport) {
    let index = report
        .target
        .node_index()
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".to_string());

    info!(
        target: "hashnet.status",
        tick = report.tick,
        target_item = %report.target,
        index = %index,
        price = %format_number(report.price),
        funds = %format_number(report.funds),
        production = %format_number(report.production),
        money_rate = %format_number(report.money_rate),
        purchased = report.purchased,
        remaining = %format_remaining(report.remaining),
        eta = %report.eta.map(format_duration).unwrap_or_else(|| "-".to_string()),
        "[SELECTOR] Target {} | ${} | {}h/s (${}/s)",
        report.target,
        format_number(report.price),
        format_number(report.production),
        format_number(report.money_rate),
    );
}

// =============================================================================
// PUBLISHED STATE
// =============================================================================

/// Minimal state surface for dashboards, published after every tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorState {
    pub ts: Option<DateTime<Utc>>,
    pub ticks: u64,
    /// Successful purchases.
    pub purchases: u64,
    /// Purchases attempted but refused by the host.
    pub failed_purchases: u64,
    pub spent: f64,
    pub last_report: Option<TickReport>,
    /// Set once the run ends (deadline or full upgrade).
    pub is_finished: bool,
}

impl SelectorState {
    pub fn record(&mut self, report: &TickReport) {
        self.ts = Some(Utc::now());
        self.ticks = report.tick;
        if report.purchased {
            self.purchases += 1;
            self.spent += report.price;
        } else if report.attempted {
            self.failed_purchases += 1;
        }
        self.last_report = Some(report.clone());
    }
}

// =============================================================================
// FORMATTING
// =============================================================================

const SUFFIXES: [&str; 7] = ["", "k", "m", "b", "t", "q", "Q"];

/// Compact number with a metric-style suffix, e.g. `1.23m`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let mut scaled = value.abs();
    let mut tier = 0;
    while scaled >= 1000.0 && tier < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        tier += 1;
    }
    if tier == SUFFIXES.len() - 1 && scaled >= 1000.0 {
        return format!("{sign}{:.2e}", value.abs());
    }
    format!("{sign}{scaled:.2}{}", SUFFIXES[tier])
}

/// `1h 02m 03s` style duration.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

pub fn format_remaining(remaining: Option<Duration>) -> String {
    remaining
        .map(format_duration)
        .unwrap_or_else(|| "unbounded".to_string())
}
