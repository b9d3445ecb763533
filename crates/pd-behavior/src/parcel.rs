//! `ParcelAgent`: asks for a vehicle and picks the nearest bidder.

use pd_core::{EntityId, TimeLapse};
use pd_spatial::EntityKind;
use tracing::debug;

use crate::{BehaviorError, BehaviorResult, Protocol, TickListener, World};

/// Progress of a parcel through the allocation protocol.  Only ever moves
/// forward.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum AllocationPhase {
    /// Has not asked for a vehicle yet.
    #[default]
    Silent,
    /// Has broadcast (or heard something) and is waiting for bids.
    Waiting,
    /// Has sent `PickMeUp` to a vehicle.  Terminal.
    Assigned,
}

/// The agent side of a parcel.  Its physical side (position, destination,
/// magnitude) lives in the plane and transport models.
#[derive(Debug)]
pub struct ParcelAgent {
    id:          EntityId,
    phase:       AllocationPhase,
    assigned_to: Option<EntityId>,
}

impl ParcelAgent {
    pub fn new(id: EntityId) -> Self {
        Self { id, phase: AllocationPhase::Silent, assigned_to: None }
    }

    #[inline]
    pub fn phase(&self) -> AllocationPhase {
        self.phase
    }

    /// The vehicle this parcel sent `PickMeUp` to.
    #[inline]
    pub fn assigned_to(&self) -> Option<EntityId> {
        self.assigned_to
    }

    /// Consume the whole inbox and, if it holds any bids, reply `PickMeUp`
    /// to the nearest bidder.  Exact ties go to the bid read first.
    fn evaluate_bids(&mut self, world: &mut World) -> BehaviorResult<()> {
        let device = world.comm.device_mut(self.id).ok_or(BehaviorError::MissingDevice(self.id))?;
        let messages = device.take_unread();
        let here = world.plane.position(self.id);

        let mut best: Option<(EntityId, f64)> = None;
        for m in messages.iter().filter(|m| m.contents == Protocol::ICan) {
            let d = match (here, world.plane.position(m.sender)) {
                (Some(a), Some(b)) => a.distance(b),
                _ => f64::INFINITY,
            };
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((m.sender, d));
            }
        }

        let Some((winner, distance)) = best else {
            debug!(parcel = %self.id, read = messages.len(), "no bids among messages");
            return Ok(());
        };
        world.comm.send(self.id, winner, Protocol::PickMeUp, &world.plane, world.tick)?;
        self.phase = AllocationPhase::Assigned;
        self.assigned_to = Some(winner);
        debug!(parcel = %self.id, vehicle = %winner, distance, "assigned");
        Ok(())
    }
}

impl TickListener for ParcelAgent {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Parcel
    }

    fn tick(&mut self, world: &mut World, _time: &mut TimeLapse) -> BehaviorResult<()> {
        if self.phase == AllocationPhase::Assigned {
            return Ok(());
        }
        let device = world.comm.device(self.id).ok_or(BehaviorError::MissingDevice(self.id))?;
        let (received, unread) = (device.received_count(), device.unread_count());

        if self.phase == AllocationPhase::Silent {
            self.phase = AllocationPhase::Waiting;
            if received == 0 {
                let reached =
                    world.comm.broadcast(self.id, Protocol::WhoCanPickMeUp, &world.plane, world.tick)?;
                debug!(parcel = %self.id, reached, "asked for a vehicle");
                return Ok(());
            }
        }

        if unread > 0 {
            self.evaluate_bids(world)?;
        }
        Ok(())
    }
}
