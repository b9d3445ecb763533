use pd_behavior::BehaviorError;
use pd_comm::CommError;
use pd_core::{EntityId, PdError};
use pd_pdp::PdpError;
use pd_spatial::SpatialError;
use thiserror::Error;

/// Problems reading configuration or scenario input.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("scenario row {row}: {reason}")]
    Scenario { row: usize, reason: String },

    #[error(transparent)]
    Invalid(#[from] PdError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error("parcel magnitude {magnitude} exceeds vehicle capacity {capacity}")]
    ParcelTooLarge { magnitude: f64, capacity: f64 },

    #[error("agent error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("transport error: {0}")]
    Pdp(#[from] PdpError),

    #[error("comm error: {0}")]
    Comm(#[from] CommError),
}

impl From<PdError> for SimError {
    fn from(e: PdError) -> Self {
        SimError::Config(ConfigError::Invalid(e))
    }
}

pub type SimResult<T> = Result<T, SimError>;
