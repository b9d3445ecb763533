//! Parcel description and lifecycle states.

use pd_core::Point;

/// The immutable description of a transport request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParcelSpec {
    /// Where the parcel must be delivered.
    pub destination: Point,
    /// Time units a vehicle spends picking it up.
    pub pickup_duration: u64,
    /// Time units a vehicle spends delivering it.
    pub delivery_duration: u64,
    /// Capacity it consumes while carried.
    pub magnitude: f64,
}

/// Where a parcel is in its lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ParcelState {
    /// On the plane, waiting for a vehicle.
    Available,
    /// Off the plane; a vehicle is spending the pickup duration.
    PickingUp,
    /// In a vehicle's contents.
    InCargo,
    /// Still in a vehicle's contents; the delivery duration is being spent.
    Delivering,
    /// Terminal.
    Delivered,
}

/// What a vehicle is doing right now, as shown to observers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum VehicleState {
    /// Free to move or start an operation.
    #[default]
    Idle,
    /// Mid-way through a pickup's duration.
    PickingUp,
    /// Mid-way through a delivery's duration.
    Delivering,
}

impl VehicleState {
    /// Label suitable for rendering next to the vehicle.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleState::Idle       => "idle",
            VehicleState::PickingUp  => "picking_up",
            VehicleState::Delivering => "delivering",
        }
    }
}

impl std::fmt::Display for VehicleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
