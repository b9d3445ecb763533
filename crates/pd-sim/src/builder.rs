//! Fluent builder for constructing a [`Sim`].

use pd_behavior::World;
use pd_core::{Point, SimConfig};
use pd_pdp::ParcelSpec;
use pd_spatial::Bounds;

use crate::sim::Pending;
use crate::{ScenarioKind, ScenarioRow, Sim, SimResult, SpawnHook};

/// Fluent builder for [`Sim`].
///
/// Entities added here are active from the very first tick, unlike
/// [`Sim::register_vehicle`] / [`Sim::register_parcel`] which take effect at
/// the next tick.
///
/// | Method              | Adds                                                  |
/// |---------------------|-------------------------------------------------------|
/// | `.vehicle(p)`       | one vehicle at `p`                                    |
/// | `.parcel(p, spec)`  | one parcel at `p`                                     |
/// | `.scenario(rows)`   | every row of a loaded CSV scenario                    |
/// | `.random_fleet()`   | `config.vehicles` vehicles and `config.parcels`       |
/// |                     | parcels at random positions, after the explicit ones  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .vehicle(Point::new(0.0, 0.0))
///     .parcel(Point::new(5.0, 0.0), spec)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:       SimConfig,
    vehicles:     Vec<Point>,
    parcels:      Vec<(Point, ParcelSpec)>,
    random_fleet: bool,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, vehicles: Vec::new(), parcels: Vec::new(), random_fleet: false }
    }

    pub fn vehicle(mut self, start: Point) -> Self {
        self.vehicles.push(start);
        self
    }

    pub fn parcel(mut self, start: Point, spec: ParcelSpec) -> Self {
        self.parcels.push((start, spec));
        self
    }

    /// Add every row of a scenario.  Parcel durations come from the config.
    pub fn scenario(mut self, rows: impl IntoIterator<Item = ScenarioRow>) -> Self {
        for row in rows {
            match (row.kind, row.destination) {
                (ScenarioKind::Vehicle, _) => self.vehicles.push(row.start),
                (ScenarioKind::Parcel, Some(destination)) => {
                    let spec = ParcelSpec {
                        destination,
                        pickup_duration: self.config.pickup_duration,
                        delivery_duration: self.config.delivery_duration,
                        magnitude: row.magnitude,
                    };
                    self.parcels.push((row.start, spec));
                }
                // The loader never yields a parcel without a destination.
                (ScenarioKind::Parcel, None) => {}
            }
        }
        self
    }

    /// Also draw `config.vehicles` vehicles and `config.parcels` parcels at
    /// random positions.
    pub fn random_fleet(mut self) -> Self {
        self.random_fleet = true;
        self
    }

    /// Validate the configuration and every placement, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let bounds = Bounds::new(self.config.min_point, self.config.max_point)?;
        let random_vehicles = if self.random_fleet { self.config.vehicles } else { 0 };
        let random_parcels = if self.random_fleet { self.config.parcels } else { 0 };
        let mut sim = Sim::new(self.config, World::new(bounds));

        for start in self.vehicles {
            let id = sim.allocate_id();
            sim.activate(Pending::vehicle(id, start))?;
        }
        for (start, spec) in self.parcels {
            sim.check_parcel(&spec)?;
            let id = sim.allocate_id();
            sim.activate(Pending::parcel(id, start, spec))?;
        }

        // Vehicles first, then each parcel's start, destination and magnitude.
        for _ in 0..random_vehicles {
            let start = sim.world.plane.random_position(&mut sim.rng);
            let id = sim.allocate_id();
            sim.activate(Pending::vehicle(id, start))?;
        }
        let generator = SpawnHook::from_config(&sim.config);
        for _ in 0..random_parcels {
            let (start, spec) = generator.random_parcel(&mut sim.rng, &sim.world.plane);
            let id = sim.allocate_id();
            sim.activate(Pending::parcel(id, start, spec))?;
        }

        Ok(sim)
    }
}
