//! # Hashnet Sim
//!
//! Deterministic stand-in for a live hashnet economy.
//!
//! ## Contents
//! - [`HashnetConstants`]: base prices, growth multipliers, caps
//! - [`formulas`]: production and price curves
//! - [`SimConfig`]: TOML-loadable settings (wallet, pacing, constants)
//! - [`SimulatedHashnet`]: the [`hashnet_core::HashnetHost`] implementation

pub mod config;
pub mod constants;
pub mod formulas;
pub mod host;

pub use config::SimConfig;
pub use constants::HashnetConstants;
pub use host::SimulatedHashnet;
