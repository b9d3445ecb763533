use pd_core::EntityId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommError {
    #[error("entity {0} has no comm device")]
    UnknownDevice(EntityId),

    #[error("entity {0} already has a comm device")]
    AlreadyRegistered(EntityId),

    #[error("invalid reliability {0}: must lie in [0, 1]")]
    InvalidReliability(f64),

    #[error("invalid range {0}: must be non-negative")]
    InvalidRange(f64),
}

pub type CommResult<T> = Result<T, CommError>;
