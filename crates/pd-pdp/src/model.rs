//! `PdpModel`: vehicle contents and parcel lifecycle.

use std::collections::HashMap;

use pd_core::{EntityId, TimeLapse};
use pd_spatial::PlaneModel;
use tracing::debug;

use crate::{ParcelSpec, ParcelState, PdpError, PdpResult, VehicleState};

// ── Internal records ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ServiceKind {
    Pickup,
    Delivery,
}

/// A pickup or delivery whose duration has not been fully spent yet.
#[derive(Clone, Debug)]
struct Service {
    kind:      ServiceKind,
    parcel:    EntityId,
    remaining: u64,
}

#[derive(Debug)]
struct VehicleRecord {
    capacity: f64,
    /// Carried parcels in pickup order.
    contents: Vec<EntityId>,
    service:  Option<Service>,
}

#[derive(Debug)]
struct ParcelRecord {
    spec:  ParcelSpec,
    state: ParcelState,
}

// ── PdpModel ──────────────────────────────────────────────────────────────────

/// The transport model.
///
/// Capacity accounting sums the magnitudes of everything in a vehicle's
/// contents, so the invariant `contents_size(v) <= capacity(v)` holds for
/// any number of carried parcels, not only the single-parcel case the agents
/// use today.
#[derive(Default)]
pub struct PdpModel {
    vehicles:  HashMap<EntityId, VehicleRecord>,
    parcels:   HashMap<EntityId, ParcelRecord>,
    /// Parcels delivered since the last [`take_delivered`](Self::take_delivered).
    delivered: Vec<EntityId>,
}

impl PdpModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────

    pub fn add_vehicle(&mut self, vehicle: EntityId, capacity: f64) -> PdpResult<()> {
        if !(capacity.is_finite() && capacity >= 0.0) {
            return Err(PdpError::InvalidMagnitude(capacity));
        }
        if self.vehicles.contains_key(&vehicle) || self.parcels.contains_key(&vehicle) {
            return Err(PdpError::AlreadyRegistered(vehicle));
        }
        self.vehicles.insert(vehicle, VehicleRecord { capacity, contents: Vec::new(), service: None });
        Ok(())
    }

    pub fn add_parcel(&mut self, parcel: EntityId, spec: ParcelSpec) -> PdpResult<()> {
        if !(spec.magnitude.is_finite() && spec.magnitude >= 0.0) {
            return Err(PdpError::InvalidMagnitude(spec.magnitude));
        }
        if self.vehicles.contains_key(&parcel) || self.parcels.contains_key(&parcel) {
            return Err(PdpError::AlreadyRegistered(parcel));
        }
        self.parcels.insert(parcel, ParcelRecord { spec, state: ParcelState::Available });
        Ok(())
    }

    /// Forget a parcel entirely.  Used when the scheduler retires it.
    ///
    /// A parcel still inside a vehicle is taken out of its contents.
    pub fn remove_parcel(&mut self, parcel: EntityId) -> Option<ParcelSpec> {
        let record = self.parcels.remove(&parcel)?;
        for v in self.vehicles.values_mut() {
            v.contents.retain(|&p| p != parcel);
            if v.service.as_ref().is_some_and(|s| s.parcel == parcel) {
                v.service = None;
            }
        }
        Some(record.spec)
    }

    /// Forget a vehicle, returning what it was carrying, including a parcel
    /// it was still in the middle of picking up.  Those parcels stay
    /// registered; the caller decides their fate.
    pub fn remove_vehicle(&mut self, vehicle: EntityId) -> Option<Vec<EntityId>> {
        let VehicleRecord { mut contents, service, .. } = self.vehicles.remove(&vehicle)?;
        if let Some(s) = service.filter(|s| s.kind == ServiceKind::Pickup) {
            contents.push(s.parcel);
        }
        Some(contents)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn parcel(&self, parcel: EntityId) -> Option<&ParcelSpec> {
        self.parcels.get(&parcel).map(|r| &r.spec)
    }

    pub fn parcel_state(&self, parcel: EntityId) -> Option<ParcelState> {
        self.parcels.get(&parcel).map(|r| r.state)
    }

    pub fn capacity(&self, vehicle: EntityId) -> Option<f64> {
        self.vehicles.get(&vehicle).map(|v| v.capacity)
    }

    /// `true` if `parcel` is in `vehicle`'s contents (including while its
    /// delivery is under way).
    pub fn container_contains(&self, vehicle: EntityId, parcel: EntityId) -> bool {
        self.vehicles.get(&vehicle).is_some_and(|v| v.contents.contains(&parcel))
    }

    /// Carried parcels in pickup order.  Empty for an unknown vehicle.
    pub fn contents(&self, vehicle: EntityId) -> &[EntityId] {
        self.vehicles.get(&vehicle).map_or(&[], |v| v.contents.as_slice())
    }

    /// Sum of the magnitudes of everything `vehicle` carries.
    pub fn contents_size(&self, vehicle: EntityId) -> f64 {
        self.contents(vehicle)
            .iter()
            .filter_map(|p| self.parcels.get(p))
            .fold(0.0, |load, r| load + r.spec.magnitude)
    }

    /// `None` for an unknown vehicle.
    pub fn vehicle_state(&self, vehicle: EntityId) -> Option<VehicleState> {
        let v = self.vehicles.get(&vehicle)?;
        Some(match v.service.as_ref().map(|s| s.kind) {
            None                          => VehicleState::Idle,
            Some(ServiceKind::Pickup)     => VehicleState::PickingUp,
            Some(ServiceKind::Delivery)   => VehicleState::Delivering,
        })
    }

    /// Drain the parcels delivered since the previous call.
    pub fn take_delivered(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.delivered)
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Start picking up `parcel` with `vehicle`.
    ///
    /// # Errors
    /// The vehicle is busy, the parcel is not available, the two are not at
    /// exactly the same position, or the parcel would push the vehicle's load
    /// past its capacity.
    pub fn pickup(
        &mut self,
        plane:   &mut PlaneModel,
        vehicle: EntityId,
        parcel:  EntityId,
        time:    &mut TimeLapse,
    ) -> PdpResult<()> {
        let v = self.vehicles.get(&vehicle).ok_or(PdpError::UnknownVehicle(vehicle))?;
        let p = self.parcels.get(&parcel).ok_or(PdpError::UnknownParcel(parcel))?;
        if v.service.is_some() {
            return Err(PdpError::VehicleBusy(vehicle));
        }
        if p.state != ParcelState::Available {
            return Err(PdpError::ParcelNotAvailable { parcel, state: p.state });
        }
        if !plane.equal_position(vehicle, parcel) {
            return Err(PdpError::NotCoLocated { vehicle, parcel });
        }
        let load = self.contents_size(vehicle);
        let magnitude = p.spec.magnitude;
        let capacity = v.capacity;
        if load + magnitude > capacity {
            return Err(PdpError::OverCapacity { vehicle, parcel, load, magnitude, capacity });
        }

        plane.remove(parcel)?;
        let duration = p.spec.pickup_duration;
        self.set_parcel_state(parcel, ParcelState::PickingUp);
        self.start_service(vehicle, ServiceKind::Pickup, parcel, duration);
        debug!(%vehicle, %parcel, duration, "pickup started");
        self.continue_service(vehicle, time)?;
        Ok(())
    }

    /// Start delivering `parcel` from `vehicle`.
    ///
    /// # Errors
    /// The vehicle is busy, does not carry the parcel, or is not exactly at
    /// the parcel's destination.
    pub fn deliver(
        &mut self,
        plane:   &PlaneModel,
        vehicle: EntityId,
        parcel:  EntityId,
        time:    &mut TimeLapse,
    ) -> PdpResult<()> {
        let v = self.vehicles.get(&vehicle).ok_or(PdpError::UnknownVehicle(vehicle))?;
        let p = self.parcels.get(&parcel).ok_or(PdpError::UnknownParcel(parcel))?;
        if v.service.is_some() {
            return Err(PdpError::VehicleBusy(vehicle));
        }
        if !v.contents.contains(&parcel) || p.state != ParcelState::InCargo {
            return Err(PdpError::NotCarried { vehicle, parcel });
        }
        if plane.position(vehicle) != Some(p.spec.destination) {
            return Err(PdpError::NotAtDestination { vehicle, parcel });
        }

        let duration = p.spec.delivery_duration;
        self.set_parcel_state(parcel, ParcelState::Delivering);
        self.start_service(vehicle, ServiceKind::Delivery, parcel, duration);
        debug!(%vehicle, %parcel, duration, "delivery started");
        self.continue_service(vehicle, time)?;
        Ok(())
    }

    /// Spend `time` on `vehicle`'s unfinished operation, completing it if the
    /// budget suffices.  Returns `true` if the vehicle is free afterwards.
    ///
    /// Must be called at the start of every vehicle tick.
    pub fn continue_service(&mut self, vehicle: EntityId, time: &mut TimeLapse) -> PdpResult<bool> {
        let v = self.vehicles.get_mut(&vehicle).ok_or(PdpError::UnknownVehicle(vehicle))?;
        let Some(service) = v.service.as_mut() else {
            return Ok(true);
        };

        let spend = service.remaining.min(time.time_left());
        time.consume(spend);
        service.remaining -= spend;
        if service.remaining > 0 {
            return Ok(false);
        }

        let Service { kind, parcel, .. } = service.clone();
        v.service = None;
        match kind {
            ServiceKind::Pickup => {
                v.contents.push(parcel);
                self.set_parcel_state(parcel, ParcelState::InCargo);
                debug!(%vehicle, %parcel, "pickup complete");
            }
            ServiceKind::Delivery => {
                v.contents.retain(|&p| p != parcel);
                self.set_parcel_state(parcel, ParcelState::Delivered);
                self.delivered.push(parcel);
                debug!(%vehicle, %parcel, "delivery complete");
            }
        }
        Ok(true)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn start_service(&mut self, vehicle: EntityId, kind: ServiceKind, parcel: EntityId, remaining: u64) {
        if let Some(v) = self.vehicles.get_mut(&vehicle) {
            v.service = Some(Service { kind, parcel, remaining });
        }
    }

    fn set_parcel_state(&mut self, parcel: EntityId, state: ParcelState) {
        if let Some(p) = self.parcels.get_mut(&parcel) {
            p.state = state;
        }
    }
}
