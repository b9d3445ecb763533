use pd_core::EntityId;
use pd_spatial::SpatialError;
use thiserror::Error;

use crate::ParcelState;

/// Contract violations of the transport model.
///
/// None of these is a recoverable runtime condition: each means the caller's
/// state machine broke an invariant.
#[derive(Debug, Error)]
pub enum PdpError {
    #[error("vehicle {0} is not registered with the transport model")]
    UnknownVehicle(EntityId),

    #[error("parcel {0} is not registered with the transport model")]
    UnknownParcel(EntityId),

    #[error("entity {0} is already registered with the transport model")]
    AlreadyRegistered(EntityId),

    #[error("invalid magnitude {0}: must be non-negative and finite")]
    InvalidMagnitude(f64),

    #[error("vehicle {0} is still busy with a previous pickup or delivery")]
    VehicleBusy(EntityId),

    #[error("parcel {parcel} cannot be picked up in state {state:?}")]
    ParcelNotAvailable { parcel: EntityId, state: ParcelState },

    #[error("vehicle {vehicle} is not at the position of parcel {parcel}")]
    NotCoLocated { vehicle: EntityId, parcel: EntityId },

    #[error("vehicle {vehicle} carries {load} of {capacity}; parcel {parcel} of {magnitude} does not fit")]
    OverCapacity {
        vehicle:   EntityId,
        parcel:    EntityId,
        load:      f64,
        magnitude: f64,
        capacity:  f64,
    },

    #[error("vehicle {vehicle} does not carry parcel {parcel}")]
    NotCarried { vehicle: EntityId, parcel: EntityId },

    #[error("vehicle {vehicle} is not at the destination of parcel {parcel}")]
    NotAtDestination { vehicle: EntityId, parcel: EntityId },

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type PdpResult<T> = Result<T, PdpError>;
