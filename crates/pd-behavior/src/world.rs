//! The shared models every listener acts on.

use pd_comm::CommModel;
use pd_core::Tick;
use pd_pdp::PdpModel;
use pd_spatial::{Bounds, PlaneModel};

use crate::Protocol;

/// Everything an agent can observe or change during its tick.
///
/// The scheduler owns one `World` and lends it mutably to one listener at a
/// time, so every change an agent makes is visible to the agents after it in
/// the same tick.  Only messages are delayed (see [`CommModel::flush`]).
pub struct World {
    /// The tick being processed.  Stamped on every message sent.
    pub tick:  Tick,
    pub plane: PlaneModel,
    pub pdp:   PdpModel,
    pub comm:  CommModel<Protocol>,
}

impl World {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            tick:  Tick::ZERO,
            plane: PlaneModel::new(bounds),
            pdp:   PdpModel::new(),
            comm:  CommModel::new(),
        }
    }
}
