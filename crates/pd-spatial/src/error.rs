//! Spatial-subsystem error type.

use thiserror::Error;

use pd_core::{EntityId, Point};

/// Errors produced by `pd-spatial`.
///
/// All of them are contract violations by the caller: the state machines in
/// `pd-behavior` never trigger them when their transition guards hold.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("entity {0} is not placed on the plane")]
    NotPlaced(EntityId),

    #[error("entity {0} is already placed on the plane")]
    AlreadyPlaced(EntityId),

    #[error("point {0} lies outside the plane")]
    OutOfBounds(Point),

    #[error("invalid plane bounds {min} .. {max}")]
    InvalidBounds { min: Point, max: Point },

    #[error("invalid speed {0}: must be positive and finite")]
    InvalidSpeed(f64),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
