//! Production and price formulas.
//!
//! All price functions return `f64::INFINITY` once the starting value is at
//! its cap, and `0.0` for a request of zero steps.

use crate::constants::HashnetConstants;

/// Hashes/second of a node.
///
/// `ram_used` reduces output proportionally to the share of RAM in use.
pub fn hash_gain_rate(
    c: &HashnetConstants,
    level: u32,
    ram_used: f64,
    ram: u32,
    cores: u32,
    mult: f64,
) -> f64 {
    let ram = ram.max(1);
    let base = c.hashes_per_level * f64::from(level);
    let ram_mult = 1.07f64.powf(f64::from(ram).log2());
    let core_mult = 1.0 + f64::from(cores.saturating_sub(1)) / 5.0;
    let free_ratio = (1.0 - ram_used / f64::from(ram)).max(0.0);
    base * ram_mult * core_mult * free_ratio * mult
}

/// Price of `extra` level upgrades starting at `start`.
pub fn level_upgrade_cost(c: &HashnetConstants, start: u32, extra: u32) -> f64 {
    if extra == 0 {
        return 0.0;
    }
    if start >= c.max_level {
        return f64::INFINITY;
    }
    let total: f64 = (0..extra)
        .map(|i| c.upgrade_level_mult.powf(f64::from(start) + f64::from(i)))
        .sum();
    10.0 * c.base_cost * total
}

/// Price of `extra` RAM doublings starting at `start_ram`.
pub fn ram_upgrade_cost(c: &HashnetConstants, start_ram: u32, extra: u32) -> f64 {
    if extra == 0 {
        return 0.0;
    }
    if start_ram >= c.max_ram {
        return f64::INFINITY;
    }
    let mut ram = f64::from(start_ram.max(1));
    let mut upgrades = ram.log2();
    let mut total = 0.0;
    for _ in 0..extra {
        total += ram * c.ram_base_cost * c.upgrade_ram_mult.powf(upgrades);
        ram *= 2.0;
        upgrades += 1.0;
    }
    total
}

/// Price of `extra` core upgrades starting at `start_cores`.
pub fn core_upgrade_cost(c: &HashnetConstants, start_cores: u32, extra: u32) -> f64 {
    stepped_cost(
        start_cores,
        extra,
        c.max_cores,
        c.upgrade_core_mult,
        c.core_base_cost,
    )
}

/// Price of `extra` cache upgrades starting at `start_cache`.
pub fn cache_upgrade_cost(c: &HashnetConstants, start_cache: u32, extra: u32) -> f64 {
    stepped_cost(
        start_cache,
        extra,
        c.max_cache,
        c.upgrade_cache_mult,
        c.cache_base_cost,
    )
}

/// `base * Σ mult^(value_i - 1)` over `extra` unit steps.
fn stepped_cost(start: u32, extra: u32, cap: u32, mult: f64, base: f64) -> f64 {
    if extra == 0 {
        return 0.0;
    }
    if start >= cap {
        return f64::INFINITY;
    }
    let total: f64 = (0..extra)
        .map(|i| mult.powf(f64::from(start) + f64::from(i) - 1.0))
        .sum();
    total * base
}

/// Price of the next node when `owned` nodes already exist.
pub fn node_cost(c: &HashnetConstants, owned: usize) -> f64 {
    if owned >= c.max_servers {
        return f64::INFINITY;
    }
    c.base_cost * c.purchase_mult.powi(owned as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> HashnetConstants {
        HashnetConstants::default()
    }

    // =========================================================================
    // Production
    // =========================================================================

    #[test]
    fn test_baseline_rate() {
        let c = constants();
        let rate = hash_gain_rate(&c, 1, 0.0, 1, 1, 1.0);
        assert!((rate - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_rate_monotone_in_each_axis() {
        let c = constants();
        let rate = |level, ram, cores| hash_gain_rate(&c, level, 0.0, ram, cores, 1.0);

        for level in 1..c.max_level {
            assert!(rate(level + 1, 8, 4) >= rate(level, 8, 4));
        }
        let mut ram = 1;
        while ram < c.max_ram {
            assert!(rate(10, ram * 2, 4) >= rate(10, ram, 4));
            ram *= 2;
        }
        for cores in 1..c.max_cores {
            assert!(rate(10, 8, cores + 1) >= rate(10, 8, cores));
        }
    }

    #[test]
    fn test_ram_in_use_reduces_rate() {
        let c = constants();
        let full = hash_gain_rate(&c, 10, 0.0, 8, 1, 1.0);
        let half = hash_gain_rate(&c, 10, 4.0, 8, 1, 1.0);
        assert!((half - full / 2.0).abs() < 1e-12);
    }

    // =========================================================================
    // Prices
    // =========================================================================

    #[test]
    fn test_prices_infinite_at_caps() {
        let c = constants();
        assert!(level_upgrade_cost(&c, c.max_level, 1).is_infinite());
        assert!(ram_upgrade_cost(&c, c.max_ram, 1).is_infinite());
        assert!(core_upgrade_cost(&c, c.max_cores, 1).is_infinite());
        assert!(cache_upgrade_cost(&c, c.max_cache, 1).is_infinite());
        assert!(node_cost(&c, c.max_servers).is_infinite());
    }

    #[test]
    fn test_zero_steps_cost_nothing() {
        let c = constants();
        assert_eq!(level_upgrade_cost(&c, 1, 0), 0.0);
        assert_eq!(ram_upgrade_cost(&c, 1, 0), 0.0);
        assert_eq!(core_upgrade_cost(&c, 1, 0), 0.0);
        assert_eq!(cache_upgrade_cost(&c, 1, 0), 0.0);
    }

    #[test]
    fn test_first_step_prices() {
        let c = constants();
        // 10 * 50k * 1.1^1
        assert!((level_upgrade_cost(&c, 1, 1) - 550_000.0).abs() < 1e-6);
        // 1 * 200k * 1.4^0
        assert!((ram_upgrade_cost(&c, 1, 1) - 200_000.0).abs() < 1e-6);
        // 1M * 1.55^0
        assert!((core_upgrade_cost(&c, 1, 1) - 1_000_000.0).abs() < 1e-6);
        // 10M * 1.85^0
        assert!((cache_upgrade_cost(&c, 1, 1) - 10_000_000.0).abs() < 1e-6);
        assert_eq!(node_cost(&c, 0), 50_000.0);
    }

    #[test]
    fn test_cumulative_equals_sum_of_steps() {
        let c = constants();
        let stepwise = level_upgrade_cost(&c, 1, 1)
            + level_upgrade_cost(&c, 2, 1)
            + level_upgrade_cost(&c, 3, 1);
        assert!((level_upgrade_cost(&c, 1, 3) - stepwise).abs() < 1e-6);

        let ram_stepwise = ram_upgrade_cost(&c, 1, 1) + ram_upgrade_cost(&c, 2, 1);
        assert!((ram_upgrade_cost(&c, 1, 2) - ram_stepwise).abs() < 1e-6);
    }

    #[test]
    fn test_node_cost_grows() {
        let c = constants();
        assert!((node_cost(&c, 2) - 50_000.0 * 3.2 * 3.2).abs() < 1e-6);
    }
}
