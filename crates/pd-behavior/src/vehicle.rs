//! `VehicleAgent`: bids on requests, then fetches and delivers one parcel.

use pd_core::{EntityId, TimeLapse};
use pd_pdp::{ParcelState, PdpError};
use pd_spatial::EntityKind;
use tracing::{debug, trace, warn};

use crate::{BehaviorError, BehaviorResult, Protocol, TickListener, World};

/// Where a vehicle is in its job cycle.
///
/// ```text
/// Idle ──PickMeUp──▶ Committed ──move──▶ EnRoutePickup ──pickup──▶ Loaded
///  ▲                                                                 │
///  └─────────────────────────── deliver ─────────────────────────────┘
/// ```
///
/// Any non-idle phase drops back to `Idle` if the target parcel disappears.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum VehiclePhase {
    #[default]
    Idle,
    /// Target chosen, nothing done toward it yet.  Transient: a vehicle
    /// commits while reading its inbox and leaves this phase in the same
    /// tick as soon as it heads for the parcel, so between ticks it is only
    /// ever seen as `EnRoutePickup`.
    Committed,
    /// Driving to the target, or busy picking it up.
    EnRoutePickup,
    /// Carrying the target toward its destination, or busy delivering it.
    Loaded,
}

/// The agent side of a vehicle.
///
/// `available` is not stored: a vehicle is available exactly when it has no
/// target.
#[derive(Debug)]
pub struct VehicleAgent {
    id:     EntityId,
    speed:  f64,
    target: Option<EntityId>,
    phase:  VehiclePhase,
}

impl VehicleAgent {
    pub fn new(id: EntityId, speed: f64) -> Self {
        Self { id, speed, target: None, phase: VehiclePhase::Idle }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.target.is_none()
    }

    #[inline]
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    #[inline]
    pub fn phase(&self) -> VehiclePhase {
        self.phase
    }

    fn release(&mut self) {
        self.target = None;
        self.phase = VehiclePhase::Idle;
    }

    /// Scan unread messages in order: bid on every request, commit on the
    /// first assignment.  Messages up to and including that assignment are
    /// consumed; anything after it stays unread.
    fn read_inbox(&mut self, world: &mut World) -> BehaviorResult<()> {
        let device = world.comm.device(self.id).ok_or(BehaviorError::MissingDevice(self.id))?;
        let mut requesters = Vec::new();
        let mut assignment = None;
        let mut scanned = 0;
        for m in device.unread_messages() {
            scanned += 1;
            match m.contents {
                Protocol::WhoCanPickMeUp => requesters.push(m.sender),
                Protocol::PickMeUp => {
                    assignment = Some(m.sender);
                    break;
                }
                Protocol::ICan => {}
            }
        }
        if let Some(device) = world.comm.device_mut(self.id) {
            device.mark_read(scanned);
        }

        for parcel in requesters {
            world.comm.send(self.id, parcel, Protocol::ICan, &world.plane, world.tick)?;
            debug!(vehicle = %self.id, %parcel, "bid");
        }

        let Some(sender) = assignment else {
            return Ok(());
        };
        // The target is the parcel nearest to where the sender stands, which
        // is not necessarily the sender itself.
        let target = world
            .plane
            .position(sender)
            .and_then(|at| world.plane.nearest_of_kind(at, EntityKind::Parcel, |_| true));
        match target {
            Some(parcel) => {
                self.target = Some(parcel);
                self.phase = VehiclePhase::Committed;
                debug!(vehicle = %self.id, %parcel, assigned_by = %sender, "committed");
            }
            None => debug!(vehicle = %self.id, %sender, "assignment from parcel no longer on the plane"),
        }
        Ok(())
    }

    /// Drive toward the target or its destination, and pick up or deliver
    /// on arrival.
    fn pursue(&mut self, world: &mut World, parcel: EntityId, time: &mut TimeLapse) -> BehaviorResult<()> {
        let in_cargo = world.pdp.container_contains(self.id, parcel);
        if !in_cargo && !world.plane.contains(parcel) {
            warn!(vehicle = %self.id, %parcel, "target vanished; abandoning");
            self.release();
            return Ok(());
        }

        if in_cargo {
            self.phase = VehiclePhase::Loaded;
            let destination = world
                .pdp
                .parcel(parcel)
                .map(|s| s.destination)
                .ok_or(PdpError::UnknownParcel(parcel))?;
            world.plane.move_toward(self.id, destination, time, self.speed)?;
            if world.plane.position(self.id) == Some(destination) {
                world.pdp.deliver(&world.plane, self.id, parcel, time)?;
                if world.pdp.parcel_state(parcel) == Some(ParcelState::Delivered) {
                    debug!(vehicle = %self.id, %parcel, "delivered");
                    self.release();
                }
            }
        } else {
            self.phase = VehiclePhase::EnRoutePickup;
            if let Some(at) = world.plane.position(parcel) {
                world.plane.move_toward(self.id, at, time, self.speed)?;
            }
            if world.plane.equal_position(self.id, parcel) {
                world.pdp.pickup(&mut world.plane, self.id, parcel, time)?;
                if world.pdp.container_contains(self.id, parcel) {
                    self.phase = VehiclePhase::Loaded;
                }
                debug!(vehicle = %self.id, %parcel, "picked up");
            }
        }
        Ok(())
    }
}

impl TickListener for VehicleAgent {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Vehicle
    }

    fn tick(&mut self, world: &mut World, time: &mut TimeLapse) -> BehaviorResult<()> {
        // Finish any pickup or delivery begun in an earlier tick.
        if !world.pdp.continue_service(self.id, time)? {
            trace!(vehicle = %self.id, state = ?world.pdp.vehicle_state(self.id), "busy");
            return Ok(());
        }
        if let Some(parcel) = self.target {
            match world.pdp.parcel_state(parcel) {
                Some(ParcelState::InCargo) if world.pdp.container_contains(self.id, parcel) => {
                    self.phase = VehiclePhase::Loaded;
                }
                Some(ParcelState::Delivered) => {
                    debug!(vehicle = %self.id, %parcel, "delivered");
                    self.release();
                }
                _ => {}
            }
        }
        if !time.has_time_left() {
            return Ok(());
        }

        if self.is_available() && world.comm.device(self.id).is_some_and(|d| d.unread_count() > 0) {
            self.read_inbox(world)?;
        }

        if let Some(parcel) = self.target {
            self.pursue(world, parcel, time)?;
        }
        Ok(())
    }
}
