//! The per-tick random parcel generator.

use pd_core::{Point, SimConfig, SimRng};
use pd_pdp::ParcelSpec;
use pd_spatial::PlaneModel;

/// Rolls once per tick whether a new parcel appears, and if so where.
///
/// All draws come from the scheduler's [`SimRng`], so a given seed always
/// produces the same arrivals.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnHook {
    probability:       f64,
    min_magnitude:     u32,
    max_magnitude:     u32,
    pickup_duration:   u64,
    delivery_duration: u64,
}

impl SpawnHook {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            probability:       config.parcel_spawn_probability,
            min_magnitude:     config.min_parcel_magnitude,
            max_magnitude:     config.max_parcel_magnitude,
            pickup_duration:   config.pickup_duration,
            delivery_duration: config.delivery_duration,
        }
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Draw a complete random parcel: start, destination, and magnitude.
    pub fn random_parcel(&self, rng: &mut SimRng, plane: &PlaneModel) -> (Point, ParcelSpec) {
        let start = plane.random_position(rng);
        let destination = plane.random_position(rng);
        let magnitude = rng.gen_range(self.min_magnitude..=self.max_magnitude) as f64;
        let spec = ParcelSpec {
            destination,
            pickup_duration: self.pickup_duration,
            delivery_duration: self.delivery_duration,
            magnitude,
        };
        (start, spec)
    }

    /// The once-per-tick roll.  `None` on most ticks.
    pub fn roll(&self, rng: &mut SimRng, plane: &PlaneModel) -> Option<(Point, ParcelSpec)> {
        if self.probability <= 0.0 || !rng.gen_bool(self.probability) {
            return None;
        }
        Some(self.random_parcel(rng, plane))
    }
}
