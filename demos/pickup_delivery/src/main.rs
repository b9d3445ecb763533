//! pickup_delivery: five trucks, a trickle of parcels, one 10 × 10 km plane.
//!
//! Usage: `pickup_delivery [config.toml] [scenario.csv]`
//!
//! Without a config file the built-in defaults apply.  A run with no
//! `end_time` stops after 20 simulated minutes.  A scenario file replaces the random initial fleet.
//! Set `RUST_LOG` (e.g. `RUST_LOG=pd_behavior=debug`) to watch the protocol.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pd_behavior::{TickListener, World};
use pd_core::{EntityId, SimConfig, Tick};
use pd_pdp::VehicleState;
use pd_sim::config::load_config;
use pd_sim::scenario::load_scenario_csv;
use pd_sim::{SimBuilder, SimObserver, WorldSnapshot};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_END_TIME:   u64 = 20 * 60 * 1_000; // 20 minutes in ms
const REPORT_EVERY_TICKS: u64 = 60;              // once per simulated minute at 1 s ticks

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs a one-line summary every `interval` ticks and tallies how often
/// vehicles were busy with a pickup or delivery.
struct ProgressObserver {
    interval:     u64,
    last_parcels: Vec<EntityId>,
    frames:       u64,
    busy_frames:  u64,
}

impl ProgressObserver {
    fn new(interval: u64) -> Self {
        Self { interval, last_parcels: Vec::new(), frames: 0, busy_frames: 0 }
    }
}

impl SimObserver for ProgressObserver {
    fn on_tick_end(&mut self, tick: Tick, world: &World) {
        let snap = WorldSnapshot::capture(world);
        self.frames += 1;
        self.busy_frames += snap.vehicles.iter().filter(|v| v.state != VehicleState::Idle).count() as u64;
        self.last_parcels = snap.parcels.iter().map(|p| p.id).collect();

        if tick.0.is_multiple_of(self.interval) {
            let loaded = snap.vehicles.iter().filter(|v| v.load > 0.0).count();
            info!(
                %tick,
                waiting = snap.parcels.len(),
                loaded,
                vehicles = snap.vehicles.len(),
                "progress"
            );
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick, world: &World) {
        let stats = world.comm.stats();
        info!(
            %final_tick,
            queued = stats.queued,
            out_of_range = stats.out_of_range,
            lost = stats.lost,
            "messaging totals"
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pickup_delivery=info,pd_sim=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);

    // 1. Configuration.
    let mut config = match args.next() {
        Some(path) => load_config(Path::new(&path)).with_context(|| format!("loading {path}"))?,
        None => SimConfig::default(),
    };
    // There is no other way to stop the demo.
    config.end_time.get_or_insert(DEFAULT_END_TIME);
    info!(
        tick_length = config.tick_length,
        end_time = ?config.end_time,
        seed = config.seed,
        "configuration loaded"
    );

    // 2. Initial fleet: a scenario file, or random placement.
    let builder = SimBuilder::new(config);
    let builder = match args.next() {
        Some(path) => {
            let rows = load_scenario_csv(Path::new(&path)).with_context(|| format!("loading {path}"))?;
            info!(rows = rows.len(), "scenario loaded");
            builder.scenario(rows)
        }
        None => builder.random_fleet(),
    };
    let mut sim = builder.build()?;

    // 3. Run.
    let mut obs = ProgressObserver::new(REPORT_EVERY_TICKS);
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    // 4. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  ticks: {}  |  virtual time: {} ms  |  parcels still waiting: {}",
        sim.clock.current_tick.0,
        sim.clock.current_time(),
        obs.last_parcels.len(),
    );
    if obs.frames > 0 {
        let vehicles = sim.vehicles().len().max(1) as f64;
        println!(
            "  vehicle time spent loading/unloading: {:.1}%",
            100.0 * obs.busy_frames as f64 / (obs.frames as f64 * vehicles)
        );
    }
    println!();

    // 5. Final vehicle table.
    println!("{:<10} {:<20} {:<10} {:<8}", "Vehicle", "Position", "Target", "Load");
    println!("{}", "-".repeat(50));
    for v in sim.vehicles() {
        let id = v.id();
        let position = sim.world.plane.position(id).map(|p| p.to_string()).unwrap_or_default();
        let target = v.target().map(|t| t.0.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "{:<10} {:<20} {:<10} {:<8.1}",
            id.0,
            position,
            target,
            sim.world.pdp.contents_size(id),
        );
    }

    Ok(())
}
