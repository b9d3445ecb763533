use pd_comm::CommError;
use pd_core::EntityId;
use pd_pdp::PdpError;
use pd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("entity {0} has no comm device")]
    MissingDevice(EntityId),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Pdp(#[from] PdpError),

    #[error(transparent)]
    Comm(#[from] CommError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
