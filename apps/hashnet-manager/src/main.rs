//! Hashnet upgrade manager.
//!
//! Wires: SimConfig → SimulatedHashnet → UpgradeSelector.
//! Spends every available coin on whichever purchase yields the most
//! hashes/second per unit of cost, until the fleet is maxed out or the
//! optional run window closes.
//!
//! Usage: cargo run -p hashnet-manager -- [HOURS] [--sim-config <path>]

mod observability;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use hashnet_core::status::{format_duration, format_number};
use hashnet_core::{HashnetHost, RunOutcome, SelectorConfig, UpgradeSelector};
use hashnet_sim::{SimConfig, SimulatedHashnet};

#[derive(Parser, Debug)]
#[command(name = "hashnet-manager")]
#[command(about = "Greedy hashnet server upgrade manager")]
struct Args {
    /// Run duration in hours (omit or 0 to run until fully upgraded)
    #[arg(allow_negative_numbers = true)]
    hours: Option<f64>,

    /// TOML file configuring the simulated economy
    #[arg(long)]
    sim_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guards = observability::init_tracing("hashnet-manager");

    let sim_config = match &args.sim_config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let config =
        SelectorConfig::from_hours(args.hours)?.with_cash_per_hash(sim_config.cash_per_hash);

    info!(
        hours = ?args.hours,
        sim_config = ?args.sim_config,
        starting_funds = sim_config.starting_funds,
        time_scale = sim_config.time_scale,
        "Hashnet manager starting"
    );

    let host = SimulatedHashnet::new(sim_config);
    let mut selector = UpgradeSelector::new(host, config);

    let outcome = tokio::select! {
        result = selector.run() => Some(result?),
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
            None
        }
    };

    let state = selector.state();
    let sim = selector.host();
    let ended = match outcome {
        Some(RunOutcome::FullyUpgraded) => "all servers fully upgraded",
        Some(RunOutcome::DeadlineReached) => "run duration finished",
        None => "interrupted",
    };

    println!("\n--- Hashnet Manager Summary ---");
    println!("Ended:       {ended}");
    println!("Sim time:    {}", format_duration(sim.elapsed()));
    println!("Ticks:       {}", state.ticks);
    println!("Nodes:       {}/{}", sim.node_count(), sim.max_nodes());
    println!("Purchases:   {}", state.purchases);
    println!("Refused:     {}", state.failed_purchases);
    println!("Spent:       ${}", format_number(sim.spent()));
    println!("Earned:      ${}", format_number(sim.earned()));
    println!("Funds:       ${}", format_number(sim.available_funds()));
    println!(
        "Production:  {}h/s (${}/s)",
        format_number(sim.production()),
        format_number(sim.production() * sim.config().cash_per_hash)
    );

    Ok(())
}
