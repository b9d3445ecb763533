//! Run configuration.
//!
//! Typically loaded from a TOML file by `pd-sim` (with the `serde` feature)
//! and passed to the simulation builder.  Every field has a default, so a
//! config file only needs to mention what it changes.

use crate::{PdError, PdResult, Point};

/// 50 km/h expressed in plane units (km) per time unit (ms).
pub const DEFAULT_VEHICLE_SPEED: f64 = 50.0 / 3_600_000.0;

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SimConfig {
    /// Time units per tick.  Default: 1000.
    pub tick_length: u64,

    /// The run halts at the first tick boundary where elapsed virtual time
    /// exceeds this value.  `None` runs until stopped externally.
    pub end_time: Option<u64>,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Lower-left corner of the plane.
    pub min_point: Point,

    /// Upper-right corner of the plane.
    pub max_point: Point,

    /// Maximum vehicle speed in plane units per time unit.
    pub vehicle_speed: f64,

    /// Capacity of every vehicle, in parcel magnitude units.
    pub vehicle_capacity: f64,

    /// Time units a pickup occupies the vehicle.
    pub pickup_duration: u64,

    /// Time units a delivery occupies the vehicle.
    pub delivery_duration: u64,

    /// Probability, rolled once per tick, that a new parcel appears.
    pub parcel_spawn_probability: f64,

    /// Smallest magnitude a randomly generated parcel can have.
    pub min_parcel_magnitude: u32,

    /// Largest magnitude a randomly generated parcel can have (inclusive).
    pub max_parcel_magnitude: u32,

    /// Broadcast range of every comm device.  `None` means unlimited.
    pub comm_range: Option<f64>,

    /// Probability that an in-range message is delivered.
    pub comm_reliability: f64,

    /// Vehicles placed at random positions when the run starts.
    pub vehicles: usize,

    /// Parcels placed at random positions when the run starts.
    pub parcels: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_length:              1_000,
            end_time:                 None,
            seed:                     123,
            min_point:                Point::new(0.0, 0.0),
            max_point:                Point::new(10.0, 10.0),
            vehicle_speed:            DEFAULT_VEHICLE_SPEED,
            vehicle_capacity:         10.0,
            pickup_duration:          60_000,
            delivery_duration:        60_000,
            parcel_spawn_probability: 0.007,
            min_parcel_magnitude:     1,
            max_parcel_magnitude:     3,
            comm_range:               Some(1_000.0),
            comm_reliability:         1.0,
            vehicles:                 5,
            parcels:                  2,
        }
    }
}

impl SimConfig {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> PdResult<()> {
        let fail = |msg: String| Err(PdError::Config(msg));

        if self.tick_length == 0 {
            return fail("tick_length must be positive".into());
        }
        if !self.min_point.is_finite() || !self.max_point.is_finite() {
            return fail("plane corners must be finite".into());
        }
        if self.min_point.x >= self.max_point.x || self.min_point.y >= self.max_point.y {
            return fail(format!(
                "min_point {} must lie strictly below and left of max_point {}",
                self.min_point, self.max_point,
            ));
        }
        if !(self.vehicle_speed.is_finite() && self.vehicle_speed > 0.0) {
            return fail(format!("vehicle_speed {} must be positive", self.vehicle_speed));
        }
        if !(self.vehicle_capacity.is_finite() && self.vehicle_capacity >= 0.0) {
            return fail(format!("vehicle_capacity {} must be non-negative", self.vehicle_capacity));
        }
        if !(0.0..=1.0).contains(&self.parcel_spawn_probability) {
            return fail(format!(
                "parcel_spawn_probability {} outside [0, 1]",
                self.parcel_spawn_probability,
            ));
        }
        if !(0.0..=1.0).contains(&self.comm_reliability) {
            return fail(format!("comm_reliability {} outside [0, 1]", self.comm_reliability));
        }
        if let Some(range) = self.comm_range {
            if range.is_nan() || range < 0.0 {
                return fail(format!("comm_range {range} must be non-negative"));
            }
        }
        if self.min_parcel_magnitude > self.max_parcel_magnitude {
            return fail(format!(
                "min_parcel_magnitude {} exceeds max_parcel_magnitude {}",
                self.min_parcel_magnitude, self.max_parcel_magnitude,
            ));
        }
        if f64::from(self.max_parcel_magnitude) > self.vehicle_capacity {
            return fail(format!(
                "max_parcel_magnitude {} exceeds vehicle_capacity {}",
                self.max_parcel_magnitude, self.vehicle_capacity,
            ));
        }
        Ok(())
    }

    /// `true` once `elapsed` virtual time is past the configured end time.
    #[inline]
    pub fn is_past_end(&self, elapsed: u64) -> bool {
        self.end_time.is_some_and(|end| elapsed > end)
    }
}
