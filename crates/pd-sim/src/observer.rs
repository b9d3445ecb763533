//! Simulation observer trait and the per-tick view it is given.

use pd_behavior::World;
use pd_core::{EntityId, Point, Tick};
use pd_pdp::VehicleState;
use pd_spatial::EntityKind;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at tick boundaries.
///
/// This is the seam for presentation: an observer reads the world once per
/// tick after every agent has acted and writes nothing back.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, tick: Tick, world: &World) {
///         if tick.0 % self.every == 0 {
///             let snap = WorldSnapshot::capture(world);
///             println!("{tick}: {} parcels waiting", snap.parcels.len());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick, after messages have been flushed and
    /// delivered parcels retired.
    fn on_tick_end(&mut self, _tick: Tick, _world: &World) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _world: &World) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

// ── WorldSnapshot ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleView {
    pub id:       EntityId,
    pub position: Point,
    pub state:    VehicleState,
    /// Summed magnitude of the carried parcels.
    pub load:     f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParcelView {
    pub id:       EntityId,
    pub position: Point,
}

/// Everything a renderer needs for one frame.  Carried parcels have no
/// position and are therefore only visible through their vehicle's `load`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldSnapshot {
    pub tick:     Tick,
    pub vehicles: Vec<VehicleView>,
    pub parcels:  Vec<ParcelView>,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let vehicles = world
            .plane
            .objects_of_kind(EntityKind::Vehicle)
            .map(|(id, position)| VehicleView {
                id,
                position,
                state: world.pdp.vehicle_state(id).unwrap_or_default(),
                load:  world.pdp.contents_size(id),
            })
            .collect();
        let parcels = world
            .plane
            .objects_of_kind(EntityKind::Parcel)
            .map(|(id, position)| ParcelView { id, position })
            .collect();
        Self { tick: world.tick, vehicles, parcels }
    }
}
